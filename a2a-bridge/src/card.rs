//! The agent card the service advertises at its well-known URL.

use crate::config::{BridgeSettings, SkillSettings};
use a2a_types::{AgentCard, AgentSkill};

/// Builds an [`AgentCard`] from settings.
///
/// The card advertises streaming and `text/plain` input and output, which is
/// what the bridge forwards as status updates and artifacts.
pub struct AgentCardBuilder<'a> {
    settings: &'a BridgeSettings,
    extra_skills: Vec<AgentSkill>,
}

impl<'a> AgentCardBuilder<'a> {
    pub fn new(settings: &'a BridgeSettings) -> Self {
        Self {
            settings,
            extra_skills: Vec::new(),
        }
    }

    /// Adds a skill on top of those listed in the settings.
    #[must_use]
    pub fn skill(mut self, skill: AgentSkill) -> Self {
        self.extra_skills.push(skill);
        self
    }

    pub fn build(self) -> AgentCard {
        let settings = self.settings;
        let card = AgentCard::new(
            settings.app_name.clone(),
            settings.description.clone(),
            settings.version.clone(),
            settings.advertised_url(),
        )
        .with_streaming(true);

        settings
            .skills
            .iter()
            .map(skill_from_settings)
            .chain(self.extra_skills)
            .fold(card, AgentCard::add_skill)
    }
}

fn skill_from_settings(skill: &SkillSettings) -> AgentSkill {
    let base = AgentSkill::new(skill.id.clone(), skill.name.clone())
        .with_description(skill.description.clone());
    let tagged = skill.tags.iter().fold(base, |s, tag| s.add_tag(tag.clone()));
    skill
        .examples
        .iter()
        .fold(tagged, |s, example| s.add_example(example.clone()))
}

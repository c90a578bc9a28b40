use crate::core::scan::Verdict;
use crate::error::AppResult;

use minijinja::{Environment, Template};
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};
use tracing::info;

static TEMPLATES_ENVIRONMENT: Lazy<Environment> = Lazy::new(|| {
    info!("Initializing templating engine environment.");
    let mut env = Environment::new();

    // Use strum to iterate over the variants of the enum.
    for template in MessageTemplate::iter() {
        env.add_template(template.name(), template.template())
            .expect("built-in message templates are valid");
    }

    info!("Templates loaded in templating engine environment.");

    env
});

/// Messages attached to a scan result when the player did not write one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MessageTemplate {
    Nice,
    Naughty,
}

impl MessageTemplate {
    pub fn for_verdict(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Nice => MessageTemplate::Nice,
            Verdict::Naughty => MessageTemplate::Naughty,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MessageTemplate::Nice => "nice.txt",
            MessageTemplate::Naughty => "naughty.txt",
        }
    }

    pub fn get(&self) -> AppResult<Template<'static, 'static>> {
        Ok(TEMPLATES_ENVIRONMENT.get_template(self.name())?)
    }

    pub fn template(&self) -> &'static str {
        match self {
            MessageTemplate::Nice => {
                "🎁 {{ name }} made the nice list with {{ score }}/100! \
                {{- ' Santa is saving the best present for you.' if score >= 90 else ' Keep it up until Christmas Eve.' }}"
            }
            MessageTemplate::Naughty => {
                "🪨 {{ name }} scored {{ score }}/100 and landed on the naughty list. \
                {{- ' Coal it is.' if score < 20 else ' There is still time to make amends.' }}"
            }
        }
    }
}

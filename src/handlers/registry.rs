use crate::models::{ImageAttachment, MealRequest, MAX_IMAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Attachment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
}

impl OptionSpec {
    fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionKind, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

/// Slash commands registered on startup. `hello` and `meal` need the model
/// API, so they are left out when no key is configured.
pub fn command_table(ai_enabled: bool) -> Vec<CommandSpec> {
    let mut table = vec![CommandSpec {
        name: "ping",
        description: "Test bot response time.",
        options: vec![],
    }];

    if !ai_enabled {
        return table;
    }

    table.push(CommandSpec {
        name: "hello",
        description: "Send a prompt to Gemini API.",
        options: vec![OptionSpec::new(
            "prompt",
            "Message to send to the API",
            OptionKind::String,
            true,
        )],
    });

    let ordinals = ["First", "Second", "Third", "Fourth", "Fifth"];
    let mut meal_options = vec![OptionSpec::new(
        "description",
        "Text description of the meal (optional if images are provided)",
        OptionKind::String,
        false,
    )];
    meal_options.extend((1..=MAX_IMAGES).map(|i| {
        OptionSpec::new(
            format!("image{}", i),
            format!("{} meal photo (optional)", ordinals[i - 1]),
            OptionKind::Attachment,
            false,
        )
    }));

    table.push(CommandSpec {
        name: "meal",
        description: "Get nutrition coaching for your meal photos and/or description.",
        options: meal_options,
    });

    table
}

/// An option value already resolved by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Attachment(ImageAttachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Ping,
    Hello { prompt: String },
    Meal(MealRequest),
}

impl BotCommand {
    /// Build a command from its name and resolved options. Option names the
    /// table does not declare are ignored; `None` means unknown command or a
    /// missing required option.
    pub fn parse(name: &str, args: Vec<(String, ArgValue)>) -> Option<Self> {
        match name {
            "ping" => Some(BotCommand::Ping),
            "hello" => args.into_iter().find_map(|(name, value)| match (name.as_str(), value) {
                ("prompt", ArgValue::Text(prompt)) => Some(BotCommand::Hello { prompt }),
                _ => None,
            }),
            "meal" => {
                let mut description = None;
                let mut slots: Vec<Option<ImageAttachment>> = vec![None; MAX_IMAGES];

                for (name, value) in args {
                    match (name.as_str(), value) {
                        ("description", ArgValue::Text(text)) => description = Some(text),
                        (slot, ArgValue::Attachment(image)) => {
                            if let Some(index) = image_slot(slot) {
                                slots[index] = Some(image);
                            }
                        }
                        _ => {}
                    }
                }

                // Keep attachment order by option slot, not arrival order
                let images = slots.into_iter().flatten().collect();
                Some(BotCommand::Meal(MealRequest::new(description, images)))
            }
            _ => None,
        }
    }
}

fn image_slot(name: &str) -> Option<usize> {
    let n: usize = name.strip_prefix("image")?.parse().ok()?;
    (1..=MAX_IMAGES).contains(&n).then(|| n - 1)
}

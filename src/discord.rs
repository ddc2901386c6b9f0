use std::sync::Arc;

use anyhow::{Context as _, Result};
use serenity::all::{
    Command, CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption,
    CreateInteractionResponseFollowup, GatewayIntents, Interaction, Message, Ready,
    ResolvedValue, ShardManager,
};
use serenity::async_trait;
use serenity::prelude::{Client, Context, EventHandler, TypeMapKey};

use crate::app::App;
use crate::handlers::{format_pong, ArgValue, BotCommand, CommandSpec, OptionKind};
use crate::models::ImageAttachment;

/// Discord rejects messages longer than this.
pub const MESSAGE_LIMIT: usize = 2000;

const UNKNOWN_COMMAND_REPLY: &str = "❌ Unknown command.";

struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

pub struct Handler {
    app: Arc<App>,
}

impl Handler {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    async fn run_command(&self, ctx: &Context, command: &CommandInteraction) -> String {
        let args = resolved_args(command);
        let parsed = BotCommand::parse(&command.data.name, args);

        match (parsed, self.app.commands.as_ref()) {
            (Some(BotCommand::Ping), _) => format_pong(shard_latency(ctx).await),
            (Some(BotCommand::Hello { prompt }), Some(commands)) => commands.hello(&prompt).await,
            (Some(BotCommand::Meal(request)), Some(commands)) => commands.meal(&request).await,
            _ => {
                log::warn!("⚠️ Unhandled command: /{}", command.data.name);
                UNKNOWN_COMMAND_REPLY.to_string()
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("✅ Logged in as: {}", ready.user.name);

        let commands = self.app.command_table.iter().map(create_command).collect();
        match Command::set_global_commands(&ctx.http, commands).await {
            Ok(synced) => log::info!("🔄 Synced {} application commands", synced.len()),
            Err(e) => log::error!("❌ Failed to sync commands: {:?}", e),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        log::info!("📨 /{} from {}", command.data.name, command.user.name);

        // Acknowledge first; Discord drops interactions not answered within 3s
        if let Err(e) = command.defer(&ctx.http).await {
            log::error!("❌ Failed to defer /{}: {:?}", command.data.name, e);
            return;
        }

        let reply = self.run_command(&ctx, &command).await;

        for chunk in split_message(&reply, MESSAGE_LIMIT) {
            let followup = CreateInteractionResponseFollowup::new().content(chunk);
            if let Err(e) = command.create_followup(&ctx.http, followup).await {
                log::error!("❌ Failed to send reply for /{}: {:?}", command.data.name, e);
                break;
            }
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(prefix) = self.app.command_prefix.as_deref() else {
            return;
        };

        if msg.content.trim() == format!("{}ping", prefix) {
            if let Err(e) = msg.channel_id.say(&ctx.http, "pong").await {
                log::error!("❌ Failed to answer {}ping: {:?}", prefix, e);
            }
        }
    }
}

fn create_command(spec: &CommandSpec) -> CreateCommand {
    spec.options.iter().fold(
        CreateCommand::new(spec.name).description(spec.description),
        |cmd, option| {
            let kind = match option.kind {
                OptionKind::String => CommandOptionType::String,
                OptionKind::Attachment => CommandOptionType::Attachment,
            };
            cmd.add_option(
                CreateCommandOption::new(kind, &option.name, &option.description)
                    .required(option.required),
            )
        },
    )
}

fn resolved_args(command: &CommandInteraction) -> Vec<(String, ArgValue)> {
    command
        .data
        .options()
        .into_iter()
        .filter_map(|option| {
            let value = match option.value {
                ResolvedValue::String(text) => ArgValue::Text(text.to_string()),
                ResolvedValue::Attachment(attachment) => ArgValue::Attachment(
                    ImageAttachment::new(&attachment.url, &attachment.filename),
                ),
                _ => return None,
            };
            Some((option.name.to_string(), value))
        })
        .collect()
}

async fn shard_latency(ctx: &Context) -> Option<std::time::Duration> {
    let data = ctx.data.read().await;
    let manager = data.get::<ShardManagerContainer>()?;
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id)?.latency
}

/// Split on char boundaries, preferring the last newline inside each window.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let window_end = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let window = &rest[..window_end];
        let cut = match window.rfind('\n') {
            Some(i) if i > 0 => i + 1,
            _ => window_end,
        };
        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Connect to the gateway and block until the client stops.
pub async fn run(token: &str, app: Arc<App>) -> Result<()> {
    let mut intents = GatewayIntents::GUILDS;
    if app.command_prefix.is_some() {
        intents |= GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;
    }

    let mut client = Client::builder(token, intents)
        .event_handler(Handler::new(app))
        .await
        .context("failed to create Discord client")?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    log::info!("🚀 Starting Discord bot...");
    client.start().await.context("Discord client stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::command_table;

    #[test]
    fn test_split_short_message() {
        assert_eq!(split_message("Pong! (12ms)", MESSAGE_LIMIT), vec!["Pong! (12ms)"]);
        assert_eq!(split_message("", MESSAGE_LIMIT), vec![""]);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 7), vec!["aaaa\n", "bbbb\n", "cccc"]);
        assert_eq!(split_message("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_counts_chars_not_bytes() {
        let text = "栄".repeat(2500);
        let chunks = split_message(&text, MESSAGE_LIMIT);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 2000);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_create_command_from_table() {
        let table = command_table(true);
        let built: Vec<_> = table.iter().map(create_command).collect();
        let meal = serde_json::to_value(&built[2]).unwrap();

        assert_eq!(meal["name"], "meal");
        assert_eq!(meal["options"].as_array().unwrap().len(), 6);
        // 11 = attachment
        assert_eq!(meal["options"][1]["type"], 11);
        assert_eq!(meal["options"][1]["name"], "image1");
    }
}

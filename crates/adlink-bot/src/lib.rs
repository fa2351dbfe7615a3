//! Telegram front door (teloxide).
//!
//! The bot holds no data of its own: every command answers with text and,
//! where useful, a web-app button that opens the mini app.

use std::sync::Arc;

use reqwest::Url;
use teloxide::{
    dispatching::{Dispatcher, HandlerExt},
    dptree,
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, WebAppInfo},
    utils::command::BotCommands,
};
use tracing::{info, warn};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "main menu")]
    Start,
    #[command(description = "how to use the marketplace")]
    Help,
    #[command(description = "open the dashboard")]
    Panel,
}

impl Command {
    /// Name as typed in chat, without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Panel => "panel",
        }
    }
}

/// Button that opens the mini app inside the chat client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAppButton {
    pub label: &'static str,
    pub url: Url,
}

impl WebAppButton {
    pub fn markup(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new([[InlineKeyboardButton::web_app(
            self.label,
            WebAppInfo {
                url: self.url.clone(),
            },
        )]])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub html: bool,
    pub button: Option<WebAppButton>,
}

const WELCOME: &str = "🎯 Welcome to adlink!\n\n\
📺 Here you can:\n\
• Register your channels\n\
• Receive advertising offers\n\
• Accept or reject offers\n\
• Track your balance and request payouts\n\n\
👇 Tap the button below to open the dashboard";

const HELP: &str = "🆘 <b>Using adlink</b>\n\n\
<b>📺 Channels</b>\n\
• Add your Telegram channels\n\
• Set the subscriber count and category\n\n\
<b>💼 Offers</b>\n\
• Receive advertising proposals\n\
• Accept an offer by picking a placement date\n\
• Reject an offer with a reason\n\n\
<b>💰 Money</b>\n\
• Check your current balance\n\
• See lifetime earnings\n\
• Request a withdrawal\n\n\
<b>🔧 Commands</b>\n\
/start - main menu\n\
/help - this help\n\
/panel - open the dashboard";

/// What the bot answers to `command`.
pub fn reply_for(command: &Command, webapp_url: &Url) -> Reply {
    match command {
        Command::Start => Reply {
            text: WELCOME.to_string(),
            html: false,
            button: Some(WebAppButton {
                label: "🚀 Open dashboard",
                url: webapp_url.clone(),
            }),
        },
        Command::Help => Reply {
            text: HELP.to_string(),
            html: true,
            button: None,
        },
        Command::Panel => Reply {
            text: "📊 Channel dashboard".to_string(),
            html: false,
            button: Some(WebAppButton {
                label: "🚀 Open panel",
                url: webapp_url.clone(),
            }),
        },
    }
}

/// Long-poll Telegram until the dispatcher stops.
pub async fn run_polling(token: String, webapp_url: Url) -> anyhow::Result<()> {
    let bot = Bot::new(token);

    match bot.get_me().await {
        Ok(me) => info!("Bot started as @{}", me.username()),
        Err(e) => warn!("Could not fetch bot identity: {}", e),
    }
    bot.set_my_commands(Command::bot_commands()).await?;

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(webapp_url)])
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    command: Command,
    webapp_url: Arc<Url>,
) -> ResponseResult<()> {
    info!("/{} from chat {}", command.name(), msg.chat.id);

    let reply = reply_for(&command, &webapp_url);
    let mut request = bot.send_message(msg.chat.id, reply.text);
    if reply.html {
        request = request.parse_mode(ParseMode::Html);
    }
    if let Some(button) = &reply.button {
        request = request.reply_markup(button.markup());
    }
    request.await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn url() -> Url {
        Url::parse("https://ads.example.com/").unwrap()
    }

    #[test]
    fn parses_commands_with_and_without_bot_name() {
        assert_eq!(Command::parse("/start", "adlink_bot").unwrap(), Command::Start);
        assert_eq!(
            Command::parse("/panel@adlink_bot", "adlink_bot").unwrap(),
            Command::Panel
        );
        assert!(Command::parse("/balance", "adlink_bot").is_err());
    }

    #[test]
    fn command_names_match_what_users_type() {
        for command in [Command::Start, Command::Help, Command::Panel] {
            let typed = format!("/{}", command.name());
            assert_eq!(Command::parse(&typed, "adlink_bot").unwrap(), command);
        }
    }

    #[test]
    fn start_and_panel_link_to_the_mini_app() {
        for command in [Command::Start, Command::Panel] {
            let reply = reply_for(&command, &url());
            assert!(!reply.html);
            let button = reply.button.expect("web app button");
            assert_eq!(button.url, url());

            let markup = button.markup();
            match &markup.inline_keyboard[0][0].kind {
                InlineKeyboardButtonKind::WebApp(info) => assert_eq!(info.url, url()),
                other => panic!("unexpected button kind: {other:?}"),
            }
        }
    }

    #[test]
    fn help_is_html_without_button() {
        let reply = reply_for(&Command::Help, &url());
        assert!(reply.html);
        assert!(reply.button.is_none());
        assert!(reply.text.contains("/panel"));
    }
}

use super::*;
use crate::*;
use colored::Colorize;
use serde::Serialize;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

/// One delivery as printed in JSON-lines mode.
#[derive(Debug, Serialize)]
struct Line<'a> {
    op: &'a str,
    chat: ChatId,
    handle: MessageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    buttons: Vec<Vec<Button>>,
}

/// [`Notifier`] that prints to stdout.
/// Stands in for a real chat channel when driving the game from a terminal.
pub struct Console {
    json: bool,
    next: AtomicI64,
}

impl Console {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            next: AtomicI64::new(0),
        }
    }
    fn print(&self, op: &str, chat: ChatId, handle: MessageId, text: Option<&str>, keyboard: Keyboard) {
        if self.json {
            let line = Line {
                op,
                chat,
                handle,
                text,
                buttons: keyboard.rows(),
            };
            match serde_json::to_string(&line) {
                Ok(json) => println!("{}", json),
                Err(e) => log::error!("[console] unserializable delivery: {}", e),
            }
        } else {
            let header = format!("[{} #{} {}]", op, handle, chat);
            let header = match op {
                "send" => header.green(),
                "edit" => header.yellow(),
                _ => header.red(),
            };
            println!("{}", header.bold());
            if let Some(text) = text {
                println!("{}", text);
            }
            keyboard.rows().iter().for_each(|row| {
                let buttons = row
                    .iter()
                    .map(|b| format!("[{} #{}]", b.label, b.data))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", buttons.cyan());
            });
        }
    }
}

#[async_trait::async_trait]
impl Notifier for Console {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError> {
        let handle = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.print("send", chat, handle, Some(text), keyboard);
        Ok(handle)
    }
    async fn edit(
        &self,
        chat: ChatId,
        handle: MessageId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError> {
        self.print("edit", chat, handle, Some(text), keyboard);
        Ok(())
    }
    async fn delete(&self, chat: ChatId, handle: MessageId) -> Result<(), DeliveryError> {
        self.print("delete", chat, handle, None, Keyboard::None);
        Ok(())
    }
}

//! Notification forwarder: one validated order, one bot API call.

use crate::bot::{BotClient, BotResult};
use crate::order::message;
use crate::order::validation::ValidatedOrder;

/// Sends validated orders to the operator chat.
#[derive(Clone)]
pub struct OrderNotifier {
    bot: BotClient,
}

impl OrderNotifier {
    pub fn new(bot: BotClient) -> Self {
        Self { bot }
    }

    /// Forward `order`. With a photo this is a single `sendPhoto` call with the
    /// message as caption; without one it is a single `sendMessage` call.
    ///
    /// The order is consumed, so a spooled photo is deleted before this
    /// returns, whatever the outcome.
    pub async fn notify(&self, order: ValidatedOrder) -> BotResult<()> {
        let text = message::render(&order, self.bot.parse_mode());
        match &order.photo {
            Some(photo) => {
                tracing::debug!(bytes = photo.len(), "Sending order with photo");
                self.bot.send_photo(&text, photo).await
            }
            None => self.bot.send_message(&text).await,
        }
    }
}

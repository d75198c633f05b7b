//! Terminal rendering of conversation messages.
//!
//! Text replies print as-is. Product cards and custom buttons print as a
//! small card with the outbound contact link resolved at render time; empty
//! display fields fall back to the storefront defaults below.

use console::{Color, style};

use shopbot_infra::links;
use shopbot_types::message::{CustomButton, Message, ProductCard, ReplyContent, Sender};

/// Image shown for a product without an image URL.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://placehold.co/400x200/4F46E5/FFFFFF?text=Product+Image";

pub const DEFAULT_DESCRIPTION: &str = "الوصف غير متوفر حاليًا.";

pub const DEFAULT_BUTTON_LABEL: &str = "تواصل الآن";

pub const DEFAULT_BUTTON_COLOR: &str = "bg-green-600";

/// Renders messages for the chat loop and the `history` command.
pub struct ChatRenderer {
    contact_number: String,
}

impl ChatRenderer {
    pub fn new(contact_number: impl Into<String>) -> Self {
        Self {
            contact_number: contact_number.into(),
        }
    }

    /// Render one message, including its rich content, as indented lines.
    pub fn render_message(&self, message: &Message) -> String {
        let label = match message.sender {
            Sender::User => style("You").green().bold(),
            Sender::Bot => style("Shop").cyan().bold(),
        };
        let mut output = format!("  {label} {}\n", message.text);

        match &message.content {
            ReplyContent::Text => {}
            ReplyContent::ProductCard(product) => output.push_str(&self.render_product(product)),
            ReplyContent::CustomButton(button) => output.push_str(&self.render_button(button)),
        }
        output
    }

    /// Numbered quick replies, selectable with `#N`.
    pub fn render_quick_replies(&self, replies: &[String]) -> String {
        let mut output = String::new();
        for (i, reply) in replies.iter().enumerate() {
            output.push_str(&format!(
                "    {} {}\n",
                style(format!("#{}", i + 1)).yellow(),
                reply
            ));
        }
        output
    }

    fn render_product(&self, product: &ProductCard) -> String {
        let description = non_empty(&product.description).unwrap_or(DEFAULT_DESCRIPTION);
        let image = non_empty(&product.image_url).unwrap_or(PLACEHOLDER_IMAGE_URL);

        let mut output = String::new();
        output.push_str(&format!("    {}\n", style(&product.name).bold()));
        output.push_str(&format!("    {} {}\n", style("Price:").dim(), product.price));
        output.push_str(&format!("    {}\n", description));
        output.push_str(&format!("    {} {}\n", style("Image:").dim(), image));
        match links::product_link(&self.contact_number, product) {
            Ok(url) => output.push_str(&format!(
                "    {} {}\n",
                style("Buy:").green().bold(),
                style(url).underlined()
            )),
            Err(e) => tracing::warn!(error = %e, "Cannot build purchase link"),
        }
        output
    }

    fn render_button(&self, button: &CustomButton) -> String {
        let label = button
            .button_label
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_BUTTON_LABEL);
        let color = button
            .color_class
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(DEFAULT_BUTTON_COLOR);

        match links::button_link(&self.contact_number, button) {
            Ok(url) => format!(
                "    {} {}\n",
                style(format!("[{label}]")).fg(accent_for(color)).bold(),
                style(url).underlined()
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Cannot build contact link");
                format!("    {}\n", style(format!("[{label}]")).fg(accent_for(color)).bold())
            }
        }
    }
}

/// Terminal color for a `bg-<color>-<shade>` class.
pub fn accent_for(color_class: &str) -> Color {
    let name = color_class
        .strip_prefix("bg-")
        .and_then(|rest| rest.split('-').next())
        .unwrap_or_default();
    match name {
        "green" | "emerald" | "lime" => Color::Green,
        "red" | "rose" => Color::Red,
        "yellow" | "amber" | "orange" => Color::Yellow,
        "blue" | "sky" | "indigo" => Color::Blue,
        "purple" | "violet" | "pink" | "fuchsia" => Color::Magenta,
        "cyan" | "teal" => Color::Cyan,
        _ => Color::Green,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopbot_types::message::BotReply;

    fn renderer() -> ChatRenderer {
        ChatRenderer::new("201013080898")
    }

    fn product(description: &str, image_url: &str) -> ProductCard {
        ProductCard {
            name: "Rose Box".to_string(),
            price: "350".to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
        }
    }

    #[test]
    fn test_text_message_renders_text_only() {
        let out = renderer().render_message(&Message::user("hello", 1));
        assert!(out.contains("hello"));
        assert!(!out.contains("wa.me"));
    }

    #[test]
    fn test_product_card_uses_defaults_for_empty_fields() {
        let reply = BotReply {
            text: "here".to_string(),
            quick_replies: vec![],
            content: ReplyContent::ProductCard(product("", "")),
        };
        let out = renderer().render_message(&Message::bot(reply, 1));

        assert!(out.contains("Rose Box"));
        assert!(out.contains(DEFAULT_DESCRIPTION));
        assert!(out.contains(PLACEHOLDER_IMAGE_URL));
        assert!(out.contains("https://wa.me/201013080898?text="));
    }

    #[test]
    fn test_product_card_keeps_given_fields() {
        let reply = BotReply {
            text: "here".to_string(),
            quick_replies: vec![],
            content: ReplyContent::ProductCard(product("Twelve red roses", "https://x/rose.png")),
        };
        let out = renderer().render_message(&Message::bot(reply, 1));

        assert!(out.contains("Twelve red roses"));
        assert!(out.contains("https://x/rose.png"));
        assert!(!out.contains(PLACEHOLDER_IMAGE_URL));
    }

    #[test]
    fn test_custom_button_defaults_label() {
        let reply = BotReply {
            text: "contact us".to_string(),
            quick_replies: vec![],
            content: ReplyContent::CustomButton(CustomButton {
                initial_text: None,
                button_label: None,
                color_class: None,
                is_custom_button: true,
            }),
        };
        let out = renderer().render_message(&Message::bot(reply, 1));

        assert!(out.contains(DEFAULT_BUTTON_LABEL));
        assert!(out.contains("wa.me/201013080898"));
    }

    #[test]
    fn test_quick_replies_are_numbered_from_one() {
        let out = renderer().render_quick_replies(&["a".to_string(), "b".to_string()]);
        assert!(out.contains("#1"));
        assert!(out.contains("#2"));
        assert!(!out.contains("#3"));
    }

    #[test]
    fn test_accent_for_color_classes() {
        assert_eq!(accent_for("bg-green-600"), Color::Green);
        assert_eq!(accent_for("bg-red-500"), Color::Red);
        assert_eq!(accent_for("bg-indigo-700"), Color::Blue);
        assert_eq!(accent_for("rounded"), Color::Green);
    }
}

//! Notification text for the human operator.

use crate::config::ParseMode;
use crate::order::validation::ValidatedOrder;

const TITLE: &str = "New order";

/// Render the notification text for `order` in the given markup dialect.
///
/// Field values are escaped so a stray `<` or `*` in a name cannot break the
/// markup the bot API parses.
pub fn render(order: &ValidatedOrder, mode: ParseMode) -> String {
    let mut text = format!(
        "{}\n\nCity: {}\nWarehouse: {}\nName: {}",
        bold(TITLE, mode),
        escape(&order.city, mode),
        escape(&order.warehouse, mode),
        escape(&order.name, mode),
    );
    if let Some(phone) = &order.phone {
        text.push_str("\nPhone: ");
        text.push_str(&escape(phone, mode));
    }
    text
}

fn bold(text: &str, mode: ParseMode) -> String {
    match mode {
        ParseMode::Html => format!("<b>{}</b>", text),
        ParseMode::Markdown => format!("*{}*", text),
    }
}

fn escape(value: &str, mode: ParseMode) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match (mode, c) {
            (ParseMode::Html, '&') => out.push_str("&amp;"),
            (ParseMode::Html, '<') => out.push_str("&lt;"),
            (ParseMode::Html, '>') => out.push_str("&gt;"),
            (ParseMode::Markdown, '_' | '*' | '`' | '[') => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(phone: Option<&str>) -> ValidatedOrder {
        ValidatedOrder {
            city: "Київ".into(),
            warehouse: "Відділення №1".into(),
            name: "Olena".into(),
            phone: phone.map(Into::into),
            photo: None,
        }
    }

    #[test]
    fn test_html_template() {
        assert_eq!(
            render(&order(Some("+380501112233")), ParseMode::Html),
            "<b>New order</b>\n\nCity: Київ\nWarehouse: Відділення №1\nName: Olena\nPhone: +380501112233"
        );
    }

    #[test]
    fn test_phone_line_omitted_when_absent() {
        let text = render(&order(None), ParseMode::Html);
        assert!(text.ends_with("Name: Olena"));
        assert!(!text.contains("Phone"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut o = order(None);
        o.name = "<i>Tom & Jerry</i>".into();
        let text = render(&o, ParseMode::Html);
        assert!(text.contains("Name: &lt;i&gt;Tom &amp; Jerry&lt;/i&gt;"));

        o.name = "snake_case *star*".into();
        let text = render(&o, ParseMode::Markdown);
        assert!(text.starts_with("*New order*"));
        assert!(text.contains(r"Name: snake\_case \*star\*"));
    }
}

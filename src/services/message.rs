//! Notification message rendering

/// Fill `{name}` in `template`; a blank name reads as "there"
pub fn render_message(template: &str, customer_name: &str) -> String {
    let name = customer_name.trim();
    let name = if name.is_empty() { "there" } else { name };
    template.replace("{name}", name)
}

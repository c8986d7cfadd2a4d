use std::io::Write;

use familiar_core::{
    CardRecord, Color, DetailRequest, Navigation, Notification, RichText, RowView, Segment,
};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn paint(text: &str, color: Color, mode: ColorMode) -> String {
    if mode.enabled() {
        text.truecolor(color.r, color.g, color.b).to_string()
    } else {
        text.to_string()
    }
}

fn rich(text: &RichText, mode: ColorMode) -> String {
    let mut out = String::new();
    for seg in &text.segments {
        match seg {
            Segment::Text(t) => out.push_str(t),
            Segment::Glyph(g) => {
                let token = format!("{{{g}}}");
                if mode.enabled() {
                    out.push_str(&token.bold().to_string());
                } else {
                    out.push_str(&token);
                }
            }
        }
    }
    out
}

/// Print a host notification (the toast equivalent).
pub fn print_notification(
    w: &mut dyn Write,
    note: &Notification,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = note.message();
    match note {
        Notification::StoreFailure if color.enabled() => writeln!(w, "{}", msg.red())?,
        Notification::NoResults if color.enabled() => writeln!(w, "{}", msg.yellow())?,
        _ => writeln!(w, "{}", msg)?,
    }
    Ok(())
}

/// Print one result row. `section` is the fast-scroll letter shown in the
/// margin when it changes from the previous row.
pub fn print_row(
    w: &mut dyn Write,
    position: usize,
    section: Option<char>,
    row: &RowView,
    color: ColorMode,
) -> std::io::Result<()> {
    let margin = section.map(String::from).unwrap_or_else(|| " ".to_string());
    let margin = if color.enabled() {
        margin.dimmed().to_string()
    } else {
        margin
    };

    let mut line = format!("{} {:>4}. ", margin, position + 1);
    if color.enabled() {
        line.push_str(&row.name.bold().to_string());
    } else {
        line.push_str(&row.name);
    }
    if row.cost.visible && !row.cost.value.is_empty() {
        line.push_str("  ");
        line.push_str(&rich(&row.cost.value, color));
    }
    if row.set.visible {
        line.push_str("  [");
        line.push_str(&paint(&row.set.value, row.set_color, color));
        line.push(']');
    }
    if row.power_toughness_visible() {
        line.push_str(&format!(
            "  {}{}{}",
            row.power.value,
            if row.slash_visible { "/" } else { "" },
            row.toughness.value
        ));
    }
    if row.loyalty.visible {
        line.push_str(&format!("  ({})", row.loyalty.value));
    }
    writeln!(w, "{}", line)?;

    if row.type_line.visible && !row.type_line.value.is_empty() {
        writeln!(w, "         {}", row.type_line.value)?;
    }
    if row.ability.visible && !row.ability.value.is_empty() {
        for part in rich(&row.ability.value, color).lines() {
            writeln!(w, "         {}", part)?;
        }
    }
    Ok(())
}

/// Print a navigation request coming from the result list.
pub fn print_navigation(
    w: &mut dyn Write,
    nav: &Navigation,
    color: ColorMode,
) -> std::io::Result<()> {
    match nav {
        Navigation::PopBack | Navigation::Finish => {
            if color.enabled() {
                writeln!(w, "{}", "(leaving result list)".dimmed())?;
            } else {
                writeln!(w, "(leaving result list)")?;
            }
        }
        Navigation::ShowDetail(req) => {
            writeln!(
                w,
                "Opening card {} of {} ({})",
                req.start + 1,
                req.ids.len(),
                order_summary(req)
            )?;
        }
    }
    Ok(())
}

fn order_summary(req: &DetailRequest) -> String {
    const MAX_SHOWN: usize = 10;
    let shown: Vec<String> = req.ids.iter().take(MAX_SHOWN).map(|id| id.to_string()).collect();
    let mut out = format!("ids: {}", shown.join(", "));
    if req.ids.len() > MAX_SHOWN {
        out.push_str(&format!(", ... +{}", req.ids.len() - MAX_SHOWN));
    }
    out
}

/// Print the card the detail viewer starts on.
pub fn print_detail(
    w: &mut dyn Write,
    card: &CardRecord,
    row: &RowView,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", card.name.bold().underline())?;
    } else {
        writeln!(w, "{}", card.name)?;
    }
    writeln!(
        w,
        "  {} #{} ({})",
        paint(&card.set, row.set_color, color),
        if card.number.is_empty() { "-" } else { card.number.as_str() },
        card.rarity.label()
    )?;
    if !card.mana_cost.is_empty() {
        writeln!(w, "  Cost: {}", card.mana_cost)?;
    }
    if !card.type_line.is_empty() {
        writeln!(w, "  Type: {}", card.type_line)?;
    }
    if !card.ability.is_empty() {
        writeln!(w, "  {}", card.ability)?;
    }
    if let Some(loyalty) = card.loyalty.display() {
        writeln!(w, "  Loyalty: {}", loyalty)?;
    } else if card.power.is_applicable() || card.toughness.is_applicable() {
        writeln!(
            w,
            "  {}/{}",
            card.power.display().unwrap_or_default(),
            card.toughness.display().unwrap_or_default()
        )?;
    }
    if !card.flavor.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", card.flavor.italic())?;
        } else {
            writeln!(w, "  {}", card.flavor)?;
        }
    }
    if !card.artist.is_empty() {
        writeln!(w, "  Illus. {}", card.artist)?;
    }
    Ok(())
}

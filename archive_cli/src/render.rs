//! Plain-text output.

use std::io::{self, Write};

use archive_core::dates::DateIndex;
use archive_core::engine::{MemberCount, MemberGroup};
use archive_core::members::{BirthOrder, Member, FALLBACK_COLOR, HOUSEHOLD_COLOR, HOUSEHOLD_NAME};
use archive_core::Encounter;
use owo_colors::OwoColorize;

/// Rendering options shared by every view.
pub struct Style<'a> {
    pub birth_order: &'a BirthOrder,
    pub unknown_location: &'a str,
    pub color: bool,
}

impl Style<'_> {
    fn member_label(&self, member: &str) -> String {
        match self.birth_order.get(member) {
            Some(m) => self.badge(member, m),
            None => self.badge(member, &Member::new(member, FALLBACK_COLOR)),
        }
    }

    /// `text` on the swatch colour, light text on dark swatches.
    fn badge(&self, text: &str, swatch: &Member) -> String {
        match swatch.rgb() {
            Some((r, g, b)) if self.color => {
                let label = format!(" {} ", text);
                let label = label.on_truecolor(r, g, b);
                if swatch.is_dark() {
                    label.white().bold().to_string()
                } else {
                    label.black().bold().to_string()
                }
            }
            _ => format!("[{}]", text),
        }
    }
}

pub fn title(out: &mut impl Write, style: &Style, rows: usize, source: &str) -> io::Result<()> {
    let heading = format!("{} 出会い住民アーカイブ", HOUSEHOLD_NAME);
    writeln!(out, "{}", style.badge(&heading, &Member::new(HOUSEHOLD_NAME, HOUSEHOLD_COLOR)))?;
    writeln!(out, "{} encounters from {}", rows, source)
}

fn encounter(out: &mut impl Write, style: &Style, e: &Encounter, indent: &str) -> io::Result<()> {
    let mut line = format!("{}{}  {}", indent, e.date, e.resident_name);
    if !e.resident_handle.is_empty() {
        line.push_str(&format!(" ({})", e.resident_handle));
    }
    if !e.attribute.is_empty() {
        line.push_str(&format!("  #{}", e.attribute));
    }
    writeln!(out, "{}", line)?;
    writeln!(out, "{}  @ {}", indent, e.location_or(style.unknown_location))?;

    if !e.url.is_empty() {
        let platform = if e.platform.is_empty() { "link" } else { e.platform.as_str() };
        writeln!(out, "{}  {}: {}", indent, platform, e.url)?;
    }
    if !e.note.is_empty() {
        writeln!(out, "{}  備考: {}", indent, e.note)?;
    }
    Ok(())
}

/// Flat list, one block per encounter.
pub fn rows(out: &mut impl Write, style: &Style, rows: &[&Encounter]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "条件に一致する出会いが見つかりませんでした。");
    }
    for e in rows {
        writeln!(out, "{}", style.member_label(&e.family_member))?;
        encounter(out, style, e, "  ")?;
    }
    Ok(())
}

/// One day, grouped by member. Groups for which `is_expanded` is false
/// show only a count and the resident names.
pub fn day(
    out: &mut impl Write,
    style: &Style,
    date: Option<&str>,
    groups: &[MemberGroup],
    is_expanded: impl Fn(&str) -> bool,
) -> io::Result<()> {
    let Some(date) = date else {
        return writeln!(out, "No encounters recorded yet.");
    };
    writeln!(out, "{}", date)?;
    if groups.is_empty() {
        return writeln!(out, "条件に一致する出会いが見つかりませんでした。");
    }

    for group in groups {
        let expanded = is_expanded(group.member);
        let marker = if expanded { "v" } else { ">" };
        writeln!(
            out,
            "{} {} ({})",
            marker,
            style.member_label(group.member),
            group.encounters.len()
        )?;
        if expanded {
            for e in &group.encounters {
                encounter(out, style, e, "    ")?;
            }
        } else {
            let names: Vec<&str> = group.encounters.iter().map(|e| e.resident_name.as_str()).collect();
            writeln!(out, "    {}", names.join(", "))?;
        }
    }
    Ok(())
}

pub fn dates(out: &mut impl Write, index: &DateIndex) -> io::Result<()> {
    if index.is_empty() {
        return writeln!(out, "No dates.");
    }
    writeln!(out, "{} days recorded", index.date_count())?;
    for month in &index.months {
        writeln!(out, "{} ({})", month.label, month.dates.len())?;
        for date in &month.dates {
            writeln!(out, "  {}", date)?;
        }
    }
    Ok(())
}

pub fn members(out: &mut impl Write, style: &Style, counts: &[MemberCount]) -> io::Result<()> {
    for c in counts {
        let suffix = if style.birth_order.contains(c.member) { "" } else { "  (not in birth order)" };
        writeln!(out, "{:>4}  {}{}", c.count, style.member_label(c.member), suffix)?;
    }
    Ok(())
}

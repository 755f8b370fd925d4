//! Plain-text rendering of the dashboard view-model.

use std::fmt::Write;

use weatherdash_core::DashboardView;

const BLANK: &str = "--";

fn or_blank(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(BLANK)
}

/// Sections whose data never arrived are rendered with placeholders.
pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_dashboard(&mut out, view);
    out
}

fn write_dashboard(out: &mut String, view: &DashboardView) -> std::fmt::Result {
    let current = &view.current;
    writeln!(out, "{}", or_blank(&current.city))?;
    writeln!(out, "{}", or_blank(&current.time))?;
    writeln!(out, "{}", or_blank(&current.temperature))?;
    writeln!(out)?;

    writeln!(out, "Hourly")?;
    for slot in &view.hourly {
        writeln!(out, "  {:<6} {:>5}", or_blank(&slot.label), or_blank(&slot.temperature))?;
    }
    writeln!(out)?;

    writeln!(out, "This week")?;
    for slot in &view.weekly {
        writeln!(
            out,
            "  {:<4} {:>5} / {:<5}",
            or_blank(&slot.weekday),
            or_blank(&slot.max),
            or_blank(&slot.min)
        )?;
    }
    writeln!(out)?;

    let moon = &view.moon;
    writeln!(out, "Moon     {}", or_blank(&moon.phase))?;
    writeln!(out, "  rise   {}", or_blank(&moon.moonrise))?;
    writeln!(out, "  set    {}", or_blank(&moon.moonset))?;
    writeln!(out)?;

    let sun = &view.sun;
    writeln!(out, "Sun")?;
    writeln!(out, "  rise   {}", or_blank(&sun.sunrise))?;
    writeln!(out, "  set    {}", or_blank(&sun.sunset))?;
    let status = sun.status.as_deref().unwrap_or("Next sun event:");
    writeln!(out, "  {} {}", status, or_blank(&sun.timer))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_renders_placeholders() {
        let text = dashboard(&DashboardView::default());

        assert!(text.starts_with("--\n--\n--\n"));
        assert!(text.matches("  --").count() >= 7);
        assert!(text.contains("Next sun event: --"));
    }

    #[test]
    fn populated_fields_are_shown() {
        let mut view = DashboardView::default();
        view.current.city = Some("New Delhi".into());
        view.hourly[0].label = Some("Now".into());
        view.hourly[0].temperature = Some("31°".into());
        view.moon.phase = Some("Full Moon".into());
        view.sun.status = Some("Sunset in:".into());
        view.sun.timer = Some("4h 16m".into());

        let text = dashboard(&view);

        assert!(text.starts_with("New Delhi\n"));
        assert!(text.contains("  Now      31°"));
        assert!(text.contains("Moon     Full Moon"));
        assert!(text.contains("  Sunset in: 4h 16m"));
    }
}

//! unwind-wrapped - Year in Review CLI for a media library
//!
//! Reads a library snapshot and prints Wrapped-style statistics for one year.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, TimeZone, Utc};
use clap::Parser;
use std::path::PathBuf;
use unwind_core::analytics::{
    available_years, compute_lifetime_overview, compute_year_statistics, KindSplit,
    LifetimeOverview, PeakDay, RankedEntry, Session, YearStatistics,
};
use unwind_core::config::TimeZoneSetting;
use unwind_core::format::{days, format_day, format_day_range, format_duration, month_abbrev};
use unwind_core::{Config, MediaKind, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "unwind-wrapped")]
#[command(about = "Unwind - Your Media Library Year in Review")]
#[command(version)]
struct Args {
    /// Snapshot file exported from the media library
    #[arg(long)]
    snapshot: PathBuf,

    /// Year to review (default: newest year with activity)
    #[arg(long)]
    year: Option<i32>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Use UTC calendar boundaries instead of the configured time zone
    #[arg(long)]
    utc: bool,

    /// List the years that have activity and exit
    #[arg(long)]
    list_years: bool,

    /// Show all-time rankings over the whole library instead of one year
    #[arg(long)]
    all_time: bool,
}

/// Where the report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Markdown,
    Json,
}

impl OutputFormat {
    fn from_export(export: Option<&str>) -> Result<Self> {
        match export {
            None => Ok(OutputFormat::Terminal),
            Some("md") => Ok(OutputFormat::Markdown),
            Some("json") => Ok(OutputFormat::Json),
            Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let format = OutputFormat::from_export(args.export.as_deref())?;

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = unwind_core::logging::init(&config.logging).ok();

    let snapshot = Snapshot::load(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;

    if args.all_time && !args.list_years {
        let overview = compute_lifetime_overview(&snapshot.items, config.analytics.lifetime_limit);
        match format {
            OutputFormat::Json => print_json(&overview)?,
            OutputFormat::Markdown => print_lifetime_markdown(&overview),
            OutputFormat::Terminal => print_lifetime_terminal(&overview),
        }
        return Ok(());
    }

    if args.utc || config.analytics.timezone == TimeZoneSetting::Utc {
        run(&args, format, &config, &snapshot, &Utc)
    } else {
        run(&args, format, &config, &snapshot, &Local)
    }
}

fn run<Tz: TimeZone>(
    args: &Args,
    format: OutputFormat,
    config: &Config,
    snapshot: &Snapshot,
    tz: &Tz,
) -> Result<()> {
    let current_year = Utc::now().with_timezone(tz).year();
    let years = available_years(&snapshot.items, tz, current_year);

    if args.list_years {
        for year in &years {
            println!("{}", year);
        }
        return Ok(());
    }

    let year = args
        .year
        .or_else(|| years.first().copied())
        .unwrap_or(current_year);
    tracing::debug!(year, available = ?years, "Selected year");

    let stats = compute_year_statistics(
        year,
        &snapshot.items,
        &snapshot.totals(),
        tz,
        &config.analytics.year_options(),
    )
    .with_person_images(snapshot)
    .context("failed to resolve person images")?;

    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Markdown => print_markdown(&stats, tz),
        OutputFormat::Terminal => print_terminal(&stats, tz),
    }

    Ok(())
}

fn rank_label(i: usize) -> String {
    match i {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        _ => format!("{}.", i + 1),
    }
}

fn hour_display(hour: u8) -> String {
    format!("{}:00", hour)
}

fn peak_day_display(peak: &PeakDay) -> String {
    match peak.date {
        Some(date) => {
            let hour = peak
                .busiest_hour()
                .map(|h| format!(", busiest around {}", hour_display(h)))
                .unwrap_or_default();
            format!("{} ({} events{})", format_day(date), peak.count, hour)
        }
        None => "—".to_string(),
    }
}

fn session_line<Tz: TimeZone>(session: &Session, tz: &Tz) -> String {
    let day = session.started_at.with_timezone(tz).naive_local().date();
    format!(
        "{} - {} on {}",
        format_duration(session.duration_secs.round() as i64),
        session.item.title,
        format_day(day)
    )
}

fn kind_splits(stats: &YearStatistics) -> [(MediaKind, KindSplit); 2] {
    [
        (MediaKind::Clip, stats.distribution.clips),
        (MediaKind::Still, stats.distribution.stills),
    ]
}

fn print_ranking(title: &str, entries: &[RankedEntry<String>]) {
    if entries.is_empty() {
        return;
    }
    println!("{}", title);
    for (i, entry) in entries.iter().enumerate() {
        println!("   {} {:<24} {:>6}", rank_label(i), entry.name, entry.count);
    }
    println!();
}

fn print_terminal<Tz: TimeZone>(stats: &YearStatistics, tz: &Tz) {
    let title = format!("🎬 YOUR {} UNWIND 🎬", stats.year);

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if !stats.has_activity() {
        println!("  No activity found for {}.", stats.year);
        println!();
        return;
    }

    println!("📊 THE NUMBERS");
    println!(
        "   Counts:   {:<12} Plays: {}",
        stats.totals.count_events, stats.totals.play_events
    );
    println!(
        "   New clips: {:<11} New stills: {}",
        stats.totals.new_clips, stats.totals.new_stills
    );
    if stats.skipped_timestamps > 0 {
        println!("   Skipped:  {} unreadable timestamps", stats.skipped_timestamps);
    }
    println!();

    println!("🔥 STREAKS");
    let streak = &stats.streaks.longest_streak;
    println!(
        "   Longest streak: {} ({})",
        days(streak.length),
        format_day_range(streak.start, streak.end)
    );
    let gap = &stats.streaks.longest_gap;
    println!(
        "   Longest break:  {} ({})",
        days(gap.length),
        format_day_range(gap.start, gap.end)
    );
    println!(
        "   Active:         {} of {} days ({:.0}%)",
        stats.streaks.active_days,
        stats.streaks.total_days,
        stats.streaks.activity_percentage()
    );
    println!();

    if !stats.sessions.is_empty() {
        println!("⏱️  SESSIONS");
        println!("   Sessions: {}", stats.sessions.len());
        if let Some(mean) = stats.sessions.mean_duration_secs() {
            println!("   Average:  {}", format_duration(mean.round() as i64));
        }
        if let Some(quickest) = stats.shortest_sessions.first() {
            println!("   Quickest: {}", session_line(quickest, tz));
        }
        if let Some(longest) = stats.longest_sessions.first() {
            println!("   Longest:  {}", session_line(longest, tz));
        }
        println!();
    }

    print_ranking("👥 TOP PEOPLE", &stats.top_people);
    print_ranking("🏷️  TOP TAGS", &stats.top_tags);
    print_ranking("▶️  TOP TAGS BY PLAYS", &stats.top_play_tags);

    if !stats.top_media.is_empty() {
        println!("🏆 TOP MEDIA");
        for (i, media) in stats.top_media.iter().enumerate() {
            println!(
                "   {} {:<24} {:>6}  ({} plays)",
                rank_label(i),
                media.item.title,
                media.count_total,
                media.play_total
            );
        }
        println!();
    }

    if !stats.efficiency.most_efficient.is_empty() {
        println!("⚡ MOST EFFICIENT");
        for entry in &stats.efficiency.most_efficient {
            println!(
                "   {:<24} {:.2} per play ({} / {})",
                entry.item.title, entry.efficiency, entry.count_total, entry.play_total
            );
        }
        println!();
    }

    println!("📚 LIBRARY");
    for (kind, split) in kind_splits(stats) {
        println!(
            "   {:<7} {} with activity, {} without",
            format!("{}:", kind.display_name()),
            split.with_activity,
            split.without_activity
        );
    }
    println!();

    println!("⏰ TIME PATTERNS");
    println!("   Peak day: {}", peak_day_display(&stats.peak_day));
    let max = stats.timeline.iter().copied().max().unwrap_or(0).max(1);
    for (month0, count) in stats.timeline.iter().enumerate() {
        let width = (*count as usize * 30 + max as usize - 1) / max as usize;
        println!(
            "   {} {:<30} {}",
            month_abbrev(month0),
            "█".repeat(width),
            count
        );
    }
    println!();
}

fn markdown_ranking(title: &str, entries: &[RankedEntry<String>]) {
    if entries.is_empty() {
        return;
    }
    println!("## {}", title);
    println!();
    for (i, entry) in entries.iter().enumerate() {
        println!("{}. **{}** - {}", i + 1, entry.name, entry.count);
    }
    println!();
}

fn print_markdown<Tz: TimeZone>(stats: &YearStatistics, tz: &Tz) {
    println!("# 🎬 {} Unwind 🎬", stats.year);
    println!();

    if !stats.has_activity() {
        println!("*No activity found for {}.*", stats.year);
        return;
    }

    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Count events | {} |", stats.totals.count_events);
    println!("| Play events | {} |", stats.totals.play_events);
    println!("| New clips | {} |", stats.totals.new_clips);
    println!("| New stills | {} |", stats.totals.new_stills);
    println!("| Sessions | {} |", stats.sessions.len());
    if let Some(mean) = stats.sessions.mean_duration_secs() {
        println!("| Average session | {} |", format_duration(mean.round() as i64));
    }
    println!();

    println!("## Streaks");
    println!();
    let streak = &stats.streaks.longest_streak;
    let gap = &stats.streaks.longest_gap;
    println!(
        "- **Longest streak:** {} ({})",
        days(streak.length),
        format_day_range(streak.start, streak.end)
    );
    println!(
        "- **Longest break:** {} ({})",
        days(gap.length),
        format_day_range(gap.start, gap.end)
    );
    println!(
        "- **Active days:** {} of {} ({:.0}%)",
        stats.streaks.active_days,
        stats.streaks.total_days,
        stats.streaks.activity_percentage()
    );
    println!();

    if !stats.top_people.is_empty() {
        println!("## Top People");
        println!();
        for (i, person) in stats.top_people.iter().enumerate() {
            match stats.person_image(&person.key) {
                Some(image) => println!(
                    "{}. ![{}]({}) **{}** - {}",
                    i + 1,
                    person.name,
                    image,
                    person.name,
                    person.count
                ),
                None => println!("{}. **{}** - {}", i + 1, person.name, person.count),
            }
        }
        println!();
    }

    markdown_ranking("Top Tags", &stats.top_tags);
    markdown_ranking("Top Tags by Plays", &stats.top_play_tags);

    if !stats.top_media.is_empty() {
        println!("## Top Media");
        println!();
        for (i, media) in stats.top_media.iter().enumerate() {
            println!(
                "{} **{}** - {} counts, {} plays",
                rank_label(i),
                media.item.title,
                media.count_total,
                media.play_total
            );
        }
        println!();
    }

    if !stats.sessions.is_empty() {
        println!("## Sessions");
        println!();
        println!("| Shortest | Longest |");
        println!("|----------|---------|");
        let rows = stats
            .shortest_sessions
            .len()
            .max(stats.longest_sessions.len());
        for i in 0..rows {
            let short = stats
                .shortest_sessions
                .get(i)
                .map(|s| session_line(s, tz))
                .unwrap_or_default();
            let long = stats
                .longest_sessions
                .get(i)
                .map(|s| session_line(s, tz))
                .unwrap_or_default();
            println!("| {} | {} |", short, long);
        }
        println!();
    }

    println!("## Library");
    println!();
    println!("| Kind | With activity | Without |");
    println!("|------|---------------|---------|");
    for (kind, split) in kind_splits(stats) {
        println!(
            "| {} | {} | {} |",
            kind.display_name(),
            split.with_activity,
            split.without_activity
        );
    }
    println!();

    println!("## Time Patterns");
    println!();
    println!("- **Peak day:** {}", peak_day_display(&stats.peak_day));
    println!();
    println!("| Month | Events |");
    println!("|-------|--------|");
    for (month0, count) in stats.timeline.iter().enumerate() {
        println!("| {} | {} |", month_abbrev(month0), count);
    }
    println!();

    println!("---");
    println!("*Generated by unwind-wrapped*");
}

fn print_lifetime_terminal(overview: &LifetimeOverview) {
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "🎬 ALL-TIME UNWIND 🎬");
    println!("╰{}╯", "─".repeat(60));
    println!();

    if overview.is_empty() {
        println!("  No activity found in this library.");
        println!();
        return;
    }

    if !overview.top_items.is_empty() {
        println!("🏆 TOP MEDIA");
        for (i, entry) in overview.top_items.iter().enumerate() {
            println!(
                "   {} {:<24} {:>6}",
                rank_label(i),
                entry.item.title,
                entry.count
            );
        }
        println!();
    }

    print_ranking("👥 TOP PEOPLE", &overview.top_people);
    print_ranking("🏷️  TOP TAGS", &overview.top_tags);

    if !overview.play_vs_count.is_empty() {
        println!("▶️  PLAYS VS COUNTS");
        for point in &overview.play_vs_count {
            println!(
                "   {:<24} {:>6} plays {:>6} counts",
                point.item.title, point.play_count, point.count
            );
        }
        println!();
    }
}

fn print_lifetime_markdown(overview: &LifetimeOverview) {
    println!("# 🎬 All-Time Unwind 🎬");
    println!();

    if overview.is_empty() {
        println!("*No activity found in this library.*");
        return;
    }

    if !overview.top_items.is_empty() {
        println!("## Top Media");
        println!();
        for (i, entry) in overview.top_items.iter().enumerate() {
            println!("{}. **{}** - {}", i + 1, entry.item.title, entry.count);
        }
        println!();
    }

    markdown_ranking("Top People", &overview.top_people);
    markdown_ranking("Top Tags", &overview.top_tags);

    if !overview.play_vs_count.is_empty() {
        println!("## Plays vs Counts");
        println!();
        println!("| Clip | Plays | Counts |");
        println!("|------|-------|--------|");
        for point in &overview.play_vs_count {
            println!(
                "| {} | {} | {} |",
                point.item.title, point.play_count, point.count
            );
        }
        println!();
    }

    println!("---");
    println!("*Generated by unwind-wrapped*");
}

fn print_json<T: serde::Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

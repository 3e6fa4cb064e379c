mod auth;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use procrastinot_core::window::Timeframe;

#[derive(Parser)]
#[command(name = "procrastinot")]
#[command(author, version, about = "Procrastinot productivity dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long, help = "API base URL override")]
    server: Option<String>,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,

    #[arg(long, help = "Disable spinner")]
    no_spinner: bool,

    #[arg(long, help = "Activity feed length", default_value = "10")]
    limit: usize,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show the dashboard (stats and recent activity)")]
    Dashboard {
        #[arg(long, help = "Activity feed length", default_value = "10")]
        limit: usize,
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Show pomodoro focus stats")]
    Stats {
        #[arg(long, help = "Show only today")]
        today: bool,
        #[arg(long, help = "Show last 7 days (default)")]
        week: bool,
        #[arg(long, help = "Show current month")]
        month: bool,
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Show the recent activity feed")]
    Activity {
        #[arg(long, help = "Number of entries", default_value = "10")]
        limit: usize,
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Export daily activity data as JSON")]
    Graph {
        #[arg(long, help = "Write to file instead of stdout")]
        output: Option<String>,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Login to Procrastinot")]
    Login,
    #[command(about = "Logout from Procrastinot")]
    Logout,
    #[command(about = "Show current logged in user")]
    Whoami,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("procrastinot=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let base_url = config::api_base_url(cli.server.as_deref());

    match cli.command {
        Some(Commands::Dashboard {
            limit,
            json,
            no_spinner,
        }) => run_dashboard(
            &base_url,
            limit,
            json || cli.json,
            no_spinner || cli.no_spinner,
        ),
        Some(Commands::Stats {
            today,
            week,
            month,
            json,
            no_spinner,
        }) => run_stats(
            &base_url,
            build_timeframe(today, week, month),
            json || cli.json,
            no_spinner || cli.no_spinner,
        ),
        Some(Commands::Activity {
            limit,
            json,
            no_spinner,
        }) => run_activity(
            &base_url,
            limit,
            json || cli.json,
            no_spinner || cli.no_spinner,
        ),
        Some(Commands::Graph { output, no_spinner }) => {
            run_graph(&base_url, output, no_spinner || cli.no_spinner)
        }
        Some(Commands::Login) => run_login(&base_url),
        Some(Commands::Logout) => auth::logout(),
        Some(Commands::Whoami) => auth::whoami(&base_url),
        None => run_dashboard(&base_url, cli.limit, cli.json, cli.no_spinner),
    }
}

fn build_timeframe(today: bool, week: bool, month: bool) -> Timeframe {
    if today {
        Timeframe::Today
    } else if week {
        Timeframe::Week
    } else if month {
        Timeframe::Month
    } else {
        Timeframe::Week
    }
}

fn authed_client(base_url: &str) -> Result<(procrastinot_core::ApiClient, auth::Credentials)> {
    let creds = auth::load_credentials().ok_or_else(|| {
        anyhow::anyhow!("Not logged in. Run 'procrastinot login' first.")
    })?;
    let client = procrastinot_core::ApiClient::new(base_url, Some(creds.token.clone()));
    Ok((client, creds))
}

fn start_spinner(message: &str, disabled: bool) -> Option<indicatif::ProgressBar> {
    if disabled {
        return None;
    }
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(indicatif::ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    Some(spinner)
}

fn stop_spinner(spinner: Option<indicatif::ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

fn run_dashboard(base_url: &str, limit: usize, json: bool, no_spinner: bool) -> Result<()> {
    use procrastinot_core::{get_dashboard, DashboardOptions};
    use tokio::runtime::Runtime;

    let (client, creds) = authed_client(base_url)?;

    let spinner = start_spinner("Fetching your data...", no_spinner || json);
    let rt = Runtime::new()?;
    let result = rt.block_on(get_dashboard(
        &client,
        &creds.user_id,
        DashboardOptions {
            feed_limit: Some(limit),
        },
    ));
    stop_spinner(spinner);
    let dashboard = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        render_dashboard(&dashboard);
    }

    Ok(())
}

fn render_dashboard(dashboard: &procrastinot_core::Dashboard) {
    use colored::Colorize;
    use comfy_table::{ContentArrangement, Table};

    let stats = &dashboard.stats;

    println!(
        "\n  {}\n",
        format!("Procrastinot - {}", dashboard.user.username).cyan()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Today", "This Week", "All Time"]);
    table.add_row(vec![
        "Tasks completed".to_string(),
        stats.today_tasks_completed.to_string(),
        stats.weekly_tasks_completed.to_string(),
        stats.tasks_completed.to_string(),
    ]);
    table.add_row(vec![
        "Focus sessions".to_string(),
        stats.today_sessions.to_string(),
        stats.weekly_sessions.to_string(),
        stats.total_sessions.to_string(),
    ]);
    table.add_row(vec![
        "Focus time".to_string(),
        format_hours(stats.today_focus_time),
        "-".to_string(),
        format_hours(stats.total_focus_time),
    ]);
    println!("{table}");

    println!(
        "\n  Streak: {}  Level: {}  Productivity: {}",
        format!("{} days", stats.streak).green().bold(),
        stats.level.to_string().cyan().bold(),
        format!("{}%", stats.productivity_score).yellow().bold(),
    );
    println!(
        "  {} pending, {} in progress",
        stats.pending_tasks, stats.in_progress_tasks
    );

    if !dashboard.recent_activity.is_empty() {
        println!("\n  {}", "Recent activity".cyan());
        print_activity_table(&dashboard.recent_activity);
    }
}

fn run_stats(base_url: &str, timeframe: Timeframe, json: bool, no_spinner: bool) -> Result<()> {
    use procrastinot_core::get_focus_report;
    use tokio::runtime::Runtime;

    let (client, creds) = authed_client(base_url)?;

    let spinner = start_spinner("Fetching sessions...", no_spinner || json);
    let rt = Runtime::new()?;
    let result = rt.block_on(get_focus_report(&client, &creds.user_id, timeframe));
    stop_spinner(spinner);
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        use colored::Colorize;
        use comfy_table::{ContentArrangement, Table};

        println!(
            "\n  {}\n",
            format!("Focus stats - {}", report.timeframe.as_str()).cyan()
        );

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Started", "Completed", "Focus time", "Avg session"]);
        table.add_row(vec![
            report.sessions_started.to_string(),
            report.sessions_completed.to_string(),
            format_hours(report.focus_hours),
            format!("{} min", report.average_session_minutes),
        ]);
        println!("{table}");
    }

    Ok(())
}

fn run_activity(base_url: &str, limit: usize, json: bool, no_spinner: bool) -> Result<()> {
    use procrastinot_core::{get_dashboard, DashboardOptions};
    use tokio::runtime::Runtime;

    let (client, creds) = authed_client(base_url)?;

    let spinner = start_spinner("Fetching your data...", no_spinner || json);
    let rt = Runtime::new()?;
    let result = rt.block_on(get_dashboard(
        &client,
        &creds.user_id,
        DashboardOptions {
            feed_limit: Some(limit),
        },
    ));
    stop_spinner(spinner);
    let dashboard = result?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&dashboard.recent_activity)?
        );
    } else if dashboard.recent_activity.is_empty() {
        println!("\n  No recent activity.\n");
    } else {
        print_activity_table(&dashboard.recent_activity);
    }

    Ok(())
}

fn print_activity_table(entries: &[procrastinot_core::ActivityEntry]) {
    use chrono::Local;
    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["When", "Activity", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry
                .timestamp
                .with_timezone(&Local)
                .format("%b %d %H:%M")
                .to_string(),
            entry.title.clone(),
            entry.description.clone(),
        ]);
    }

    println!("{table}");
}

fn run_graph(base_url: &str, output: Option<String>, no_spinner: bool) -> Result<()> {
    use procrastinot_core::get_activity_graph;
    use tokio::runtime::Runtime;

    let (client, creds) = authed_client(base_url)?;

    let spinner = start_spinner("Fetching your data...", no_spinner);
    let rt = Runtime::new()?;
    let result = rt.block_on(get_activity_graph(&client, &creds.user_id));
    stop_spinner(spinner);
    let graph = result?;

    let json = serde_json::to_string_pretty(&graph)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            use colored::Colorize;
            println!("  {}", format!("Graph data written to {path}").green());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn run_login(base_url: &str) -> Result<()> {
    use tokio::runtime::Runtime;

    let rt = Runtime::new()?;
    rt.block_on(auth::login(base_url))
}

fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use procrastinot_core::ApiClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

fn get_credentials_path() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config/procrastinot/credentials.json")
}

fn ensure_config_dir() -> Result<()> {
    let config_dir = dirs::home_dir()
        .expect("Could not determine home directory")
        .join(".config/procrastinot");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&config_dir, fs::Permissions::from_mode(0o700))?;
        }
    }
    Ok(())
}

pub fn save_credentials(credentials: &Credentials) -> Result<()> {
    ensure_config_dir()?;
    let path = get_credentials_path();
    let json = serde_json::to_string_pretty(credentials)?;
    fs::write(&path, json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

pub fn load_credentials() -> Option<Credentials> {
    let path = get_credentials_path();
    if !path.exists() {
        return None;
    }

    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

pub fn clear_credentials() -> Result<bool> {
    let path = get_credentials_path();
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

pub async fn login(base_url: &str) -> Result<()> {
    use colored::Colorize;

    if let Some(creds) = load_credentials() {
        println!(
            "\n  {}",
            format!("Already logged in as {}", creds.username.bold()).yellow()
        );
        println!(
            "{}",
            "  Run 'procrastinot logout' to sign out first.\n".bright_black()
        );
        return Ok(());
    }

    println!("\n  {}\n", "Procrastinot - Login".cyan());
    println!("{}", format!("  Server: {}", base_url).bright_black());

    print!("  Email: ");
    use std::io::Write;
    std::io::stdout().flush()?;
    let mut email = String::new();
    std::io::stdin().read_line(&mut email)?;
    let email = email.trim();
    if email.is_empty() {
        anyhow::bail!("Email must not be empty.");
    }

    let password = rpassword::prompt_password("  Password: ")?;

    println!("{}", "  Signing in...".bright_black());

    let client = ApiClient::new(base_url, None);
    let response = client.login(email, &password).await?;

    let credentials = Credentials {
        token: response.token,
        user_id: response.user.id.clone(),
        username: response.user.username.clone(),
        email: response.user.email.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    save_credentials(&credentials)?;

    println!(
        "\n  {}",
        format!("Success! Logged in as {}", response.user.username.bold()).green()
    );
    println!(
        "{}",
        "  Run 'procrastinot dashboard' to see your stats.\n".bright_black()
    );

    Ok(())
}

pub fn logout() -> Result<()> {
    use colored::Colorize;

    let credentials = load_credentials();

    if credentials.is_none() {
        println!("\n  {}\n", "Not logged in.".yellow());
        return Ok(());
    }

    let username = credentials.unwrap().username;
    let cleared = clear_credentials()?;

    if cleared {
        println!(
            "\n  {}\n",
            format!("Logged out from {}", username.bold()).green()
        );
    } else {
        anyhow::bail!("Failed to clear credentials.");
    }

    Ok(())
}

pub fn whoami(base_url: &str) -> Result<()> {
    use colored::Colorize;

    let credentials = load_credentials();

    if credentials.is_none() {
        println!("\n  {}", "Not logged in.".yellow());
        println!(
            "{}",
            "  Run 'procrastinot login' to authenticate.\n".bright_black()
        );
        return Ok(());
    }

    let creds = credentials.unwrap();

    println!("\n  {}\n", "Procrastinot - Account Info".cyan());
    println!("{}", format!("  Username:  {}", creds.username.bold()).white());
    println!("{}", format!("  Email:     {}", creds.email).white());
    println!("{}", format!("  Server:    {}", base_url).bright_black());

    if let Ok(created) = chrono::DateTime::parse_from_rfc3339(&creds.created_at) {
        println!(
            "{}",
            format!("  Logged in: {}", created.format("%Y-%m-%d")).bright_black()
        );
    }

    println!();

    Ok(())
}

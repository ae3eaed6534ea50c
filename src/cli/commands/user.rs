use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_success, print_table};
use crate::cli::OutputFormat;
use crate::database::models::UserRole;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List accounts with their roles")]
    List,

    #[command(about = "Grant the Admin role")]
    Promote {
        #[arg(help = "Account name")]
        name: String,
    },

    #[command(about = "Revoke the Admin role")]
    Demote {
        #[arg(help = "Account name")]
        name: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let service = UserService::new(super::connect().await?);

    match cmd {
        UserCommands::List => {
            let users = service.list_all().await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?),
                OutputFormat::Text if users.is_empty() => println!("No users registered"),
                OutputFormat::Text => {
                    let rows: Vec<Vec<String>> = users
                        .iter()
                        .map(|u| vec![u.id.to_string(), u.name.clone(), u.email.clone(), u.role.to_string()])
                        .collect();
                    print_table(&["ID", "NAME", "EMAIL", "ROLE"], &rows);
                }
            }
            Ok(())
        }
        UserCommands::Promote { name } => set_role(&service, &name, UserRole::Admin, &output_format).await,
        UserCommands::Demote { name } => set_role(&service, &name, UserRole::User, &output_format).await,
    }
}

async fn set_role(service: &UserService, name: &str, role: UserRole, output_format: &OutputFormat) -> anyhow::Result<()> {
    let user = service.set_role(name, role).await?;
    output_success(
        output_format,
        &format!("{} is now {}", user.name, user.role),
        Some(json!({ "user": user })),
    )
}

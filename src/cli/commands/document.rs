//! Document commands: `create`, `get`, `update`, `delete`
//!
//! Each command issues exactly one repository call and prints the envelope.

use super::{report, CommandOptions, EXIT_CONFIG};
use crate::adapters::database::{create_repository, DocumentRepository};
use crate::config::PharmaConfig;
use crate::domain::{
    DocumentId, PharmaDetails, ResponseEnvelope, Revision, UpdatePharmaDetails,
};
use chrono::NaiveDate;
use clap::Args;
use std::sync::Arc;

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Drug name
    #[arg(long)]
    pub name: String,

    /// Manufacturer batch number
    #[arg(long)]
    pub batch_number: Option<String>,

    /// Manufacturer name
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Units in the batch
    #[arg(long)]
    pub quantity: Option<u32>,

    /// Manufacture date (YYYY-MM-DD)
    #[arg(long)]
    pub manufactured_on: Option<NaiveDate>,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expired_on: Option<NaiveDate>,
}

impl CreateArgs {
    /// Builds the creation payload from the arguments
    pub fn to_details(&self) -> Result<PharmaDetails, String> {
        let mut builder = PharmaDetails::builder().name(&self.name);
        if let Some(batch_number) = &self.batch_number {
            builder = builder.batch_number(batch_number);
        }
        if let Some(manufacturer) = &self.manufacturer {
            builder = builder.manufacturer(manufacturer);
        }
        if let Some(quantity) = self.quantity {
            builder = builder.quantity(quantity);
        }
        if let Some(date) = self.manufactured_on {
            builder = builder.manufactured_on(date);
        }
        if let Some(date) = self.expired_on {
            builder = builder.expired_on(date);
        }
        builder.build()
    }

    /// Execute the create command
    pub async fn execute(&self, options: &CommandOptions) -> anyhow::Result<i32> {
        let details = match self.to_details() {
            Ok(details) => details,
            Err(e) => {
                eprintln!("❌ Invalid batch record: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        run(options, |repository, config| async move {
            let ctx = options.context(&config);
            repository.create_document(&ctx, &details).await
        })
        .await
    }
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Document id
    #[arg(long)]
    pub id: DocumentId,
}

impl GetArgs {
    /// Execute the get command
    pub async fn execute(&self, options: &CommandOptions) -> anyhow::Result<i32> {
        run(options, |repository, config| async move {
            let ctx = options.context(&config);
            repository.get_document(&ctx, &self.id).await
        })
        .await
    }
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Document id
    #[arg(long)]
    pub id: DocumentId,

    /// Revision last read for this document
    #[arg(long)]
    pub rev: Revision,

    /// New drug name
    #[arg(long)]
    pub name: String,

    /// New expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub expired_on: NaiveDate,
}

impl UpdateArgs {
    /// Execute the update command
    pub async fn execute(&self, options: &CommandOptions) -> anyhow::Result<i32> {
        let update = UpdatePharmaDetails::new(
            self.id.clone(),
            self.rev.clone(),
            &self.name,
            self.expired_on,
        );

        run(options, |repository, config| async move {
            let ctx = options.context(&config);
            repository.update_document(&ctx, &update).await
        })
        .await
    }
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document id
    #[arg(long)]
    pub id: DocumentId,

    /// Current revision of the document
    #[arg(long)]
    pub rev: Revision,
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(&self, options: &CommandOptions) -> anyhow::Result<i32> {
        run(options, |repository, config| async move {
            let ctx = options.context(&config);
            repository.delete_document(&ctx, &self.id, &self.rev).await
        })
        .await
    }
}

/// Loads configuration, builds the repository, runs one call, reports it
async fn run<F, Fut>(options: &CommandOptions, call: F) -> anyhow::Result<i32>
where
    F: FnOnce(Arc<dyn DocumentRepository>, PharmaConfig) -> Fut,
    Fut: std::future::Future<Output = ResponseEnvelope>,
{
    let Some(config) = options.load() else {
        return Ok(EXIT_CONFIG);
    };

    let repository = match create_repository(&config) {
        Ok(repository) => repository,
        Err(e) => {
            eprintln!("❌ Failed to create repository: {e}");
            return Ok(EXIT_CONFIG);
        }
    };

    tracing::info!(backend = %repository.describe(), "Repository ready");
    let envelope = call(repository, config).await;
    report(&envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_args_to_details() {
        let args = CreateArgs {
            name: "Aspirin".to_string(),
            batch_number: Some("LOT-7".to_string()),
            manufacturer: None,
            quantity: Some(500),
            manufactured_on: NaiveDate::from_ymd_opt(2024, 1, 1),
            expired_on: NaiveDate::from_ymd_opt(2026, 1, 1),
        };

        let details = args.to_details().unwrap();
        assert_eq!(details.name, "Aspirin");
        assert_eq!(details.batch_number.as_deref(), Some("LOT-7"));
        assert_eq!(details.quantity, Some(500));
    }

    #[test]
    fn test_create_args_reject_reversed_dates() {
        let args = CreateArgs {
            name: "Aspirin".to_string(),
            batch_number: None,
            manufacturer: None,
            quantity: None,
            manufactured_on: NaiveDate::from_ymd_opt(2026, 1, 1),
            expired_on: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        assert!(args.to_details().is_err());
    }
}

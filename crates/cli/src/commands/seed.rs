use crate::commands::{open_pool, prepare, CommandResult, StepFailure};
use goldapi_db::{migrations, GoldSeedDataset, SeedResult, VerificationResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;
        let outcome = load_and_verify(&pool).await;
        pool.close().await;
        outcome
    });

    match result {
        Ok(seed) => CommandResult::success(
            "seed",
            format!(
                "gold seed dataset ready: {} product(s) and {} customer(s) inserted; segments: {}",
                seed.products_inserted,
                seed.customers_inserted,
                seed.segments.join(", ")
            ),
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

async fn load_and_verify(pool: &goldapi_db::DbPool) -> Result<SeedResult, StepFailure> {
    migrations::run_pending(pool).await.map_err(|error| ("migration", error.to_string(), 5u8))?;

    let seed = GoldSeedDataset::load(pool)
        .await
        .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

    let verification = GoldSeedDataset::verify(pool)
        .await
        .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

    if !verification.all_present {
        return Err(("seed_verification", verification_failure_message(&verification), 6u8));
    }

    Ok(seed)
}

fn verification_failure_message(verification: &VerificationResult) -> String {
    let failed_checks = verification
        .checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "some seed rows failed to load".to_string()
    } else {
        format!("seed verification failed for: {}", failed_checks.join(", "))
    }
}

use crate::infra::{seed_directory, SeededDirectory};
use clap::Args;
use jobport::board::{
    Actor, ApplicationId, ApplicationStatus, BoardService, MemoryStore, StoreNotifier,
};
use jobport::error::AppError;
use std::sync::Arc;

type DemoService = BoardService<MemoryStore, StoreNotifier<MemoryStore>>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the bulk triage portion of the walkthrough.
    #[arg(long)]
    pub(crate) skip_bulk: bool,
}

struct DemoCast {
    ada: Actor,
    bram: Actor,
    nora: Actor,
    theo: Actor,
    mara: Actor,
}

fn resolve_cast(service: &DemoService, directory: &SeededDirectory) -> Option<DemoCast> {
    Some(DemoCast {
        ada: service.resolve_actor(&directory.first_applicant).ok()?,
        bram: service.resolve_actor(&directory.second_applicant).ok()?,
        nora: service.resolve_actor(&directory.northbeam_rep).ok()?,
        theo: service.resolve_actor(&directory.tidewater_rep).ok()?,
        mara: service.resolve_actor(&directory.admin).ok()?,
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { skip_bulk } = args;

    let store = Arc::new(MemoryStore::default());
    let directory = seed_directory(store.as_ref())?;
    let notifier = Arc::new(StoreNotifier::new(store.clone()));
    let service = BoardService::new(store, notifier);

    println!("Job application board demo");
    println!(
        "Cast: {} and {} (applicants), {} (Northbeam Analytics), {} (Tidewater Logistics), {} (admin)",
        directory.first_applicant.0,
        directory.second_applicant.0,
        directory.northbeam_rep.0,
        directory.tidewater_rep.0,
        directory.admin.0
    );

    let cast = match resolve_cast(&service, &directory) {
        Some(cast) => cast,
        None => {
            println!("seeded subjects failed to resolve, aborting demo");
            return Ok(());
        }
    };

    println!("\nIntake");
    let application = match service.create_application(
        &cast.ada,
        &directory.platform_offer.id,
        Some("Four years running ingestion pipelines.".to_string()),
    ) {
        Ok(application) => application,
        Err(err) => {
            println!("- first application refused: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} applied to '{}' -> {} ({})",
        cast.ada.user_id.0,
        directory.platform_offer.title,
        application.id.0,
        application.status.label()
    );

    match service.create_application(&cast.ada, &directory.platform_offer.id, None) {
        Ok(_) => println!("- duplicate application unexpectedly accepted"),
        Err(err) => println!("- second attempt refused: {err}"),
    }
    match service.can_apply(&cast.ada, &directory.platform_offer.id) {
        Ok(open) => println!(
            "- could {} re-apply to {}? {}",
            cast.ada.user_id.0, directory.platform_offer.id.0, open
        ),
        Err(err) => println!("- advisory check failed: {err}"),
    }
    match service.can_apply(&cast.ada, &directory.data_offer.id) {
        Ok(open) => println!(
            "- could {} still apply to {}? {}",
            cast.ada.user_id.0, directory.data_offer.id.0, open
        ),
        Err(err) => println!("- advisory check failed: {err}"),
    }

    println!("\nTriage");
    match service.update_application_status(
        &cast.theo,
        &application.id,
        ApplicationStatus::Reviewed,
    ) {
        Ok(_) => println!("- rep from the other company was unexpectedly allowed"),
        Err(err) => println!("- {} (other company) blocked: {}", cast.theo.user_id.0, err),
    }

    let ops_application =
        match service.create_application(&cast.bram, &directory.ops_offer.id, None) {
            Ok(application) => application,
            Err(err) => {
                println!("- application to '{}' refused: {err}", directory.ops_offer.title);
                return Ok(());
            }
        };
    println!(
        "- {} applied to '{}' -> {}",
        cast.bram.user_id.0, directory.ops_offer.title, ops_application.id.0
    );
    match service.update_application_status(
        &cast.theo,
        &ops_application.id,
        ApplicationStatus::Reviewed,
    ) {
        Ok(updated) => println!(
            "- {} (own company) moved {} to {}",
            cast.theo.user_id.0,
            updated.id.0,
            updated.status.label()
        ),
        Err(err) => println!("- transition refused: {err}"),
    }

    let advances = [
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
    ];
    for status in advances {
        match service.update_application_status(&cast.nora, &application.id, status) {
            Ok(updated) => println!(
                "- {} moved {} to {}",
                cast.nora.user_id.0,
                updated.id.0,
                updated.status.label()
            ),
            Err(err) => println!("- transition refused: {err}"),
        }
    }
    match service.update_application_status(
        &cast.nora,
        &application.id,
        ApplicationStatus::Rejected,
    ) {
        Ok(_) => println!("- terminal application unexpectedly moved"),
        Err(err) => println!("- follow-up change refused: {err}"),
    }

    if !skip_bulk {
        println!("\nBulk triage");
        let second =
            match service.create_application(&cast.bram, &directory.platform_offer.id, None) {
                Ok(application) => application,
                Err(err) => {
                    println!("- second applicant blocked: {err}");
                    return Ok(());
                }
            };
        println!(
            "- {} also applied to '{}' -> {}",
            cast.bram.user_id.0, directory.platform_offer.title, second.id.0
        );

        let batch = [
            application.id.clone(),
            second.id.clone(),
            ApplicationId("app-unknown".to_string()),
        ];
        match service.bulk_update_application_status(
            &cast.nora,
            &batch,
            ApplicationStatus::Reviewed,
        ) {
            Ok(outcome) => {
                println!(
                    "- batch to reviewed: {} succeeded, {} failed",
                    outcome.succeeded.len(),
                    outcome.failed.len()
                );
                for id in &outcome.succeeded {
                    println!("    ok   {}", id.0);
                }
                for (id, failure) in &outcome.failed {
                    println!("    fail {} ({})", id.0, failure.label());
                }
            }
            Err(err) => println!("- bulk update refused: {err}"),
        }
    }

    println!("\nInbox for {}", cast.ada.user_id.0);
    let inbox = match service.notifications(&cast.ada) {
        Ok(rows) => rows,
        Err(err) => {
            println!("  inbox unavailable: {err}");
            return Ok(());
        }
    };
    if inbox.is_empty() {
        println!("  empty");
    }
    for notification in &inbox {
        let read_state = if notification.is_read { "read" } else { "unread" };
        println!(
            "  - [{}] {} ({})",
            notification.kind.label(),
            notification.message,
            read_state
        );
    }
    if let Some(first) = inbox.first() {
        match service.mark_notification_read(&cast.ada, &first.id) {
            Ok(()) => println!("  marked {} read", first.id.0),
            Err(err) => println!("  mark read failed: {err}"),
        }
    }

    match service.application(&cast.mara, &application.id) {
        Ok(row) => match serde_json::to_string_pretty(&row) {
            Ok(json) => println!("\nStored application (admin view):\n{json}"),
            Err(err) => println!("\nStored application not serializable: {err}"),
        },
        Err(err) => println!("\nAdmin read failed: {err}"),
    }

    Ok(())
}

use crate::app::{AppContext, MirrorError, Result};
use crate::domain::{Credentials, FeedSource};
use crate::store::Store;
use crate::sync::{SyncOptions, SyncReport, SyncStatus};

pub async fn add_source(
    ctx: &AppContext,
    name: &str,
    remote_id: &str,
    credentials: Option<Credentials>,
) -> Result<()> {
    // Check if the source already exists
    if ctx.store.get_source_by_name(name)?.is_some() {
        println!("Source already exists: {}", name);
        return Ok(());
    }

    let mut source = FeedSource::new(name.to_string(), remote_id.to_string());
    source.credentials = credentials;
    let source_id = ctx.store.add_source(&source)?;
    source.id = Some(source_id);
    println!("Added source: {}", name);

    // Run the first sync right away
    let report = ctx.engine.synchronize(&source, &SyncOptions::default()).await?;

    if let Some(merged) = ctx.store.get_source(source_id)? {
        if let Some(title) = merged.title {
            println!("Feed title: {}", title);
        }
    }
    println!("Fetched {} entries", report.created);

    Ok(())
}

pub async fn remove_source(ctx: &AppContext, name: &str) -> Result<()> {
    let source = ctx
        .store
        .get_source_by_name(name)?
        .ok_or_else(|| MirrorError::SourceNotFound(name.to_string()))?;

    if let Some(id) = source.id {
        ctx.store.delete_source(id)?;
    }
    println!("Removed source: {}", name);
    Ok(())
}

pub async fn sync(
    ctx: &AppContext,
    name: Option<&str>,
    options: SyncOptions,
    json: bool,
) -> Result<()> {
    let results = match name {
        Some(name) => {
            let source = ctx
                .store
                .get_source_by_name(name)?
                .ok_or_else(|| MirrorError::SourceNotFound(name.to_string()))?;

            let result = ctx.engine.synchronize(&source, &options).await;
            vec![(source.source_name, result)]
        }
        None => {
            let sources = ctx.store.get_all_sources()?;

            if sources.is_empty() {
                println!("No sources to sync");
                return Ok(());
            }

            if !json {
                println!("Syncing {} sources...", sources.len());
            }

            ctx.syncer.sync_all(sources, options).await
        }
    };

    if json {
        print_json(&results);
        return Ok(());
    }

    let mut created = 0;
    let mut updated = 0;
    let mut deleted = 0;
    let mut unchanged = 0;
    let mut errors = 0;

    for (name, result) in &results {
        match result {
            Ok(report) if report.status == SyncStatus::Unchanged => {
                unchanged += 1;
                println!("  {} unchanged", name);
            }
            Ok(report) => {
                created += report.created;
                updated += report.updated;
                deleted += report.deleted;
                println!(
                    "  {}: {} created, {} updated, {} deleted",
                    name, report.created, report.updated, report.deleted
                );
            }
            Err(e) => {
                errors += 1;
                eprintln!("  Error syncing {}: {}", name, e);
            }
        }
    }

    println!(
        "Sync complete: {} created, {} updated, {} deleted, {} unchanged, {} errors",
        created, updated, deleted, unchanged, errors
    );
    Ok(())
}

fn print_json(results: &[(String, Result<SyncReport>)]) {
    let rendered: Vec<serde_json::Value> = results
        .iter()
        .map(|(name, result)| match result {
            Ok(report) => serde_json::json!({ "source": name, "report": report }),
            Err(e) => serde_json::json!({ "source": name, "error": e.to_string() }),
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&rendered).expect("Failed to serialize sync reports")
    );
}

pub fn list_sources(ctx: &AppContext) -> Result<()> {
    let sources = ctx.store.get_all_sources()?;

    if sources.is_empty() {
        println!("No sources");
        return Ok(());
    }

    for source in sources {
        let source_id = match source.id {
            Some(id) => id,
            None => continue,
        };
        let count = ctx.store.count_entries(source_id)?;
        let last_synced = source
            .last_synced_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());

        println!(
            "{} ({} entries, last synced {})\n  {}",
            source.display_title(),
            count,
            last_synced,
            source.syndication_url()
        );
    }

    Ok(())
}

pub fn list_entries(ctx: &AppContext) -> Result<()> {
    let sources = ctx.store.get_all_sources()?;
    let mut any = false;

    for source in sources {
        let source_id = match source.id {
            Some(id) => id,
            None => continue,
        };
        let entries = ctx.store.get_entries_by_source(source_id)?;
        if entries.is_empty() {
            continue;
        }

        any = true;
        println!("{}", source.display_title());
        for entry in entries {
            println!(
                "  {} {} [{}]",
                entry.published_at.format("%Y-%m-%d"),
                entry.title,
                entry.slug
            );
        }
    }

    if !any {
        println!("No entries");
    }

    Ok(())
}

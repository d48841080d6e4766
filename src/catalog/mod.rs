//! Option catalog loading.
//!
//! Turns the service / option / choice tables into an assembled
//! `ServiceCatalog` for the configurator and the booking flow. The service
//! itself is authoritative: a failed options fetch degrades to a catalog
//! without options rather than failing the page.

pub mod queries;

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::AppCache;
use crate::error::Result;
use crate::models::{OptionChoiceRow, ServiceCatalog, ServiceOption, ServiceOptionRow, ServiceRow};

/// Group option and choice rows into an assembled catalog.
///
/// Pure and deterministic: options and choices are ordered by
/// display_order with a stable sort, so rows sharing a display_order keep
/// their arrival (insertion) order.
pub fn assemble_catalog(
    service: ServiceRow,
    mut option_rows: Vec<ServiceOptionRow>,
    choice_rows: Vec<OptionChoiceRow>,
) -> ServiceCatalog {
    option_rows.sort_by_key(|o| o.display_order);

    let mut options: Vec<ServiceOption> = option_rows
        .into_iter()
        .map(|option| ServiceOption {
            option,
            choices: Vec::new(),
        })
        .collect();

    let mut sorted_choices = choice_rows;
    sorted_choices.sort_by_key(|c| c.display_order);

    for choice in sorted_choices {
        if let Some(option) = options.iter_mut().find(|o| o.id() == choice.option_id) {
            option.choices.push(choice);
        }
        // choices of a concurrently deleted option are dropped
    }

    ServiceCatalog { service, options }
}

/// Load the catalog for one service slug, cache-first.
///
/// Missing service surfaces as `AppError::NotFound`. A failing options or
/// choices fetch is logged and degrades to an option-less catalog; the
/// degraded result is not cached so the next request retries the fetch.
pub async fn load_catalog(
    pool: &PgPool,
    cache: &AppCache,
    slug: &str,
) -> Result<Arc<ServiceCatalog>> {
    if let Some(cached) = cache.catalogs.get(slug).await {
        tracing::debug!("Cache HIT for catalog: {}", slug);
        return Ok(cached);
    }
    tracing::debug!("Cache MISS for catalog: {}", slug);

    let service = queries::service_by_slug(pool, slug).await?;

    let mut degraded = false;
    let (option_rows, choice_rows) = if service.has_options {
        match load_option_rows(pool, service.id).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(
                    "Options fetch failed for service '{}', serving without options: {}",
                    slug,
                    e
                );
                degraded = true;
                (Vec::new(), Vec::new())
            }
        }
    } else {
        (Vec::new(), Vec::new())
    };

    let catalog = Arc::new(assemble_catalog(service, option_rows, choice_rows));

    if !degraded {
        cache
            .catalogs
            .insert(slug.to_string(), Arc::clone(&catalog))
            .await;
    }

    Ok(catalog)
}

async fn load_option_rows(
    pool: &PgPool,
    service_id: i64,
) -> Result<(Vec<ServiceOptionRow>, Vec<OptionChoiceRow>)> {
    let options = queries::options_for_service(pool, service_id).await?;
    let choices = queries::choices_for_service(pool, service_id).await?;
    Ok((options, choices))
}

/// Assembled options of one service for the back-office editor
pub async fn load_options(pool: &PgPool, service_id: i64) -> Result<Vec<ServiceOption>> {
    let service = queries::service_by_id(pool, service_id).await?;
    let (option_rows, choice_rows) = load_option_rows(pool, service.id).await?;
    Ok(assemble_catalog(service, option_rows, choice_rows).options)
}

/// Move one option up or down within its service's display order,
/// renumbering the siblings so ties cannot accumulate. Returns false when
/// the option is already at the edge.
pub async fn move_option(pool: &PgPool, option_id: i64, up: bool) -> Result<bool> {
    let option = queries::option_by_id(pool, option_id).await?;
    let siblings = queries::options_for_service(pool, option.service_id).await?;

    let index = siblings
        .iter()
        .position(|o| o.id == option_id)
        .ok_or(crate::error::AppError::NotFound)?;

    let neighbor = if up {
        index.checked_sub(1)
    } else if index + 1 < siblings.len() {
        Some(index + 1)
    } else {
        None
    };
    let Some(neighbor) = neighbor else {
        return Ok(false);
    };

    let mut ordered_ids: Vec<i64> = siblings.iter().map(|o| o.id).collect();
    ordered_ids.swap(index, neighbor);
    queries::renumber_options(pool, &ordered_ids).await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_fixtures::service_row;

    fn option_row(id: i64, name: &str, display_order: i32) -> ServiceOptionRow {
        ServiceOptionRow {
            id,
            service_id: 1,
            name: name.to_string(),
            kind: "select".to_string(),
            is_required: true,
            display_order,
        }
    }

    fn choice_row(id: i64, option_id: i64, label: &str, display_order: i32) -> OptionChoiceRow {
        OptionChoiceRow {
            id,
            option_id,
            label: label.to_string(),
            price_modifier: None,
            display_order,
        }
    }

    #[test]
    fn test_assemble_groups_choices_under_their_options() {
        let catalog = assemble_catalog(
            service_row(Some("39.00")),
            vec![option_row(1, "Type de véhicule", 0), option_row(2, "Finition", 1)],
            vec![
                choice_row(10, 1, "Berline", 0),
                choice_row(20, 2, "Standard", 0),
                choice_row(11, 1, "SUV", 1),
            ],
        );

        assert_eq!(catalog.options.len(), 2);
        assert_eq!(catalog.options[0].choices.len(), 2);
        assert_eq!(catalog.options[0].choices[0].label, "Berline");
        assert_eq!(catalog.options[1].choices.len(), 1);
    }

    #[test]
    fn test_assemble_orders_by_display_order() {
        let catalog = assemble_catalog(
            service_row(Some("39.00")),
            vec![option_row(1, "Second", 5), option_row(2, "First", 0)],
            vec![
                choice_row(10, 1, "B", 2),
                choice_row(11, 1, "A", 1),
            ],
        );

        assert_eq!(catalog.options[0].name(), "First");
        assert_eq!(catalog.options[1].name(), "Second");
        assert_eq!(catalog.options[1].choices[0].label, "A");
    }

    #[test]
    fn test_assemble_preserves_insertion_order_on_ties() {
        // equal display_order: arrival order (ascending id) must survive
        let catalog = assemble_catalog(
            service_row(Some("39.00")),
            vec![
                option_row(7, "Premier créé", 1),
                option_row(8, "Deuxième créé", 1),
                option_row(9, "Troisième créé", 1),
            ],
            vec![
                choice_row(10, 7, "Un", 0),
                choice_row(11, 7, "Deux", 0),
                choice_row(12, 7, "Trois", 0),
            ],
        );

        let names: Vec<&str> = catalog.options.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["Premier créé", "Deuxième créé", "Troisième créé"]);

        let labels: Vec<&str> = catalog.options[0]
            .choices
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Un", "Deux", "Trois"]);
    }

    #[test]
    fn test_assemble_drops_orphan_choices() {
        let catalog = assemble_catalog(
            service_row(Some("39.00")),
            vec![option_row(1, "Type de véhicule", 0)],
            vec![
                choice_row(10, 1, "Berline", 0),
                choice_row(99, 42, "Orpheline", 0),
            ],
        );

        assert_eq!(catalog.options.len(), 1);
        assert_eq!(catalog.options[0].choices.len(), 1);
    }
}

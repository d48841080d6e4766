//! Public storefront route handlers.
//!
//! Handlers precompute display-ready strings and flags; templates stay free
//! of pricing or fallback logic.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::booking::{format_money, pricing, ConfigSession};
use crate::catalog;
use crate::db;
use crate::error::{ApiResult, AppError, Result};
use crate::models::content::{TESTIMONIAL_APPROVED, TESTIMONIAL_PENDING};
use crate::models::TestimonialRow;
use crate::models::service::OPTION_KIND_RADIO;
use crate::models::{FaqRow, HeroSettings, NavLink, PlanRow, ServiceRow};
use crate::AppState;

/// One navigation entry rendered in the header
#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

/// Card for a service in listings
pub struct ServiceCard {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price_label: String,
    pub image_url: String,
    pub has_image: bool,
}

impl ServiceCard {
    fn from_row(service: &ServiceRow) -> Self {
        // configurable services advertise their starting price; others show
        // their flat label, or a quote hint when no price is set at all
        let price_label = if service.has_options {
            match service.base_price {
                Some(base) => format!("dès {} CHF", format_money(base)),
                None => "Tarif sur devis".to_string(),
            }
        } else {
            service
                .price
                .clone()
                .unwrap_or_else(|| "Tarif sur devis".to_string())
        };

        Self {
            name: service.name.clone(),
            slug: service.slug.clone(),
            description: service.description.clone().unwrap_or_default(),
            price_label,
            image_url: service.image_url.clone().unwrap_or_default(),
            has_image: service.image_url.is_some(),
        }
    }
}

pub struct PlanView {
    pub name: String,
    pub price_label: String,
    pub points: Vec<String>,
    pub popular: bool,
}

impl PlanView {
    fn from_row(plan: &PlanRow) -> Self {
        Self {
            name: plan.name.clone(),
            price_label: plan.price_label.clone(),
            points: plan.point_list(),
            popular: plan.popular,
        }
    }
}

pub struct TestimonialView {
    pub author: String,
    pub role: String,
    pub rating: i32,
    pub text: String,
}

pub struct ZoneView {
    pub name: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    nav: Vec<NavItem>,
    hero: HeroSettings,
    services: Vec<ServiceCard>,
    plans: Vec<PlanView>,
    testimonials: Vec<TestimonialView>,
    faqs: Vec<FaqRow>,
    zones: Vec<ZoneView>,
    has_plans: bool,
    has_testimonials: bool,
    has_faqs: bool,
    has_zones: bool,
}

#[derive(Template)]
#[template(path = "services/list.html")]
struct ServicesTemplate {
    nav: Vec<NavItem>,
    services: Vec<ServiceCard>,
    has_services: bool,
}

/// One selectable choice on the configurator
pub struct ChoiceView {
    pub id: i64,
    pub label: String,
    /// " (+15.00 CHF)" suffix; empty for zero modifiers
    pub price_suffix: String,
    pub selected: bool,
}

/// One configurable option on the configurator
pub struct OptionView {
    pub id: i64,
    pub name: String,
    pub is_required: bool,
    pub is_select: bool,
    pub misconfigured: bool,
    pub choices: Vec<ChoiceView>,
}

pub struct PriceLineView {
    pub label: String,
    pub amount: String,
}

#[derive(Template)]
#[template(path = "services/detail.html")]
struct ServiceDetailTemplate {
    nav: Vec<NavItem>,
    name: String,
    slug: String,
    page_title: String,
    description: String,
    image_url: String,
    has_image: bool,
    options: Vec<OptionView>,
    has_options: bool,
    base_price: String,
    lines: Vec<PriceLineView>,
    total: String,
    flat_price: String,
    can_book: bool,
    missing_required: bool,
    misconfigured: bool,
}

#[derive(Template)]
#[template(path = "tarifs.html")]
struct TarifsTemplate {
    nav: Vec<NavItem>,
    plans: Vec<PlanView>,
    has_plans: bool,
}

#[derive(Template)]
#[template(path = "booking/form.html")]
struct BookingFormTemplate {
    nav: Vec<NavItem>,
    services: Vec<ServiceCard>,
    preselected_service: String,
    prefilled_city: String,
    prefilled_notes: String,
}

#[derive(Template)]
#[template(path = "pages/view.html")]
struct PageTemplate {
    nav: Vec<NavItem>,
    title: String,
    content: String,
    meta_description: String,
    has_meta_description: bool,
}

/// Header navigation: fixed storefront entries plus published pages marked
/// for the navbar
async fn site_nav(state: &AppState) -> Result<Vec<NavItem>> {
    let mut nav = vec![
        NavItem {
            label: "Accueil".to_string(),
            href: "/".to_string(),
        },
        NavItem {
            label: "Services".to_string(),
            href: "/services".to_string(),
        },
        NavItem {
            label: "Tarifs".to_string(),
            href: "/tarifs".to_string(),
        },
    ];

    for page in db::nav_pages(&state.db).await? {
        nav.push(NavItem {
            label: page.title.clone(),
            href: format!("/pages/{}", page.slug),
        });
    }

    // extra links configured in the back-office
    if let Some(value) = state.cache.cached_setting(&state.db, "navbar_config").await? {
        if let Ok(links) = serde_json::from_value::<Vec<NavLink>>((*value).clone()) {
            for link in links {
                nav.push(NavItem {
                    label: link.label,
                    href: link.href,
                });
            }
        }
    }

    nav.push(NavItem {
        label: "Réserver".to_string(),
        href: "/booking".to_string(),
    });

    Ok(nav)
}

/// Homepage handler
pub async fn home(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;

    let hero_value = state
        .cache
        .cached_setting(&state.db, "hero")
        .await?
        .map(|v| (*v).clone());
    let hero = HeroSettings::from_value(hero_value);

    let services = state.cache.cached_services(&state.db).await?;
    let plans = db::list_plans(&state.db).await?;
    let testimonials = db::testimonials_by_status(&state.db, TESTIMONIAL_APPROVED).await?;
    let faqs = db::list_faqs(&state.db).await?;
    let zones = db::list_zones(&state.db).await?;

    Ok(HomeTemplate {
        nav,
        hero,
        services: services.iter().map(ServiceCard::from_row).collect(),
        has_plans: !plans.is_empty(),
        has_testimonials: !testimonials.is_empty(),
        has_faqs: !faqs.is_empty(),
        has_zones: !zones.is_empty(),
        plans: plans.iter().map(PlanView::from_row).collect(),
        testimonials: testimonials
            .into_iter()
            .map(|t| TestimonialView {
                author: t.author,
                role: t.role.unwrap_or_default(),
                rating: t.rating,
                text: t.text,
            })
            .collect(),
        faqs,
        zones: zones
            .into_iter()
            .map(|z| ZoneView {
                name: z.name,
                description: z.description.unwrap_or_default(),
            })
            .collect(),
    })
}

/// Services listing
pub async fn services(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;
    let services = state.cache.cached_services(&state.db).await?;

    Ok(ServicesTemplate {
        nav,
        has_services: !services.is_empty(),
        services: services.iter().map(ServiceCard::from_row).collect(),
    })
}

/// Service detail / configurator
pub async fn service_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;
    let catalog = catalog::load_catalog(&state.db, &state.cache, &slug).await?;

    // seed the configuration session the way the browser will see it
    let mut session = ConfigSession::begin();
    session.catalog_loaded(catalog.clone());

    let options: Vec<OptionView> = catalog
        .options
        .iter()
        .map(|option| OptionView {
            id: option.id(),
            name: option.name().to_string(),
            is_required: option.is_required(),
            is_select: option.option.kind != OPTION_KIND_RADIO,
            misconfigured: option.is_required() && option.choices.is_empty(),
            choices: option
                .choices
                .iter()
                .map(|choice| ChoiceView {
                    id: choice.id,
                    label: choice.label.clone(),
                    price_suffix: if choice.modifier().is_zero() {
                        String::new()
                    } else {
                        format!(" ({} CHF)", pricing::signed_amount(choice.modifier()))
                    },
                    selected: session.selections().get(option.id()) == Some(choice.id),
                })
                .collect(),
        })
        .collect();

    let lines = pricing::price_breakdown(&catalog.options, session.selections())
        .into_iter()
        .map(|line| PriceLineView {
            label: line.label,
            amount: pricing::signed_amount(line.amount),
        })
        .collect();

    let service = &catalog.service;
    let has_options = service.has_options && !catalog.options.is_empty();
    let misconfigured = options.iter().any(|o| o.misconfigured);

    // flat-priced services never touch the calculator; their label is
    // displayed verbatim
    let total = if has_options {
        format_money(session.total())
    } else {
        String::new()
    };

    Ok(ServiceDetailTemplate {
        nav,
        name: service.name.clone(),
        slug: service.slug.clone(),
        page_title: service
            .page_title
            .clone()
            .unwrap_or_else(|| "Configurez votre service".to_string()),
        description: service.description.clone().unwrap_or_default(),
        image_url: service.image_url.clone().unwrap_or_default(),
        has_image: service.image_url.is_some(),
        options,
        has_options,
        base_price: format_money(catalog.base_price()),
        lines,
        total,
        flat_price: service
            .price
            .clone()
            .unwrap_or_else(|| "Tarif sur devis".to_string()),
        can_book: session.can_submit(),
        missing_required: !session.can_submit() && !misconfigured,
        misconfigured,
    })
}

/// Pricing plans page
pub async fn tarifs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;
    let plans = db::list_plans(&state.db).await?;

    Ok(TarifsTemplate {
        nav,
        has_plans: !plans.is_empty(),
        plans: plans.iter().map(PlanView::from_row).collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct BookingFormQuery {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Booking form page; `?service=` preselects a service, `?city=` prefills
/// the city and a notes hint
pub async fn booking_form(
    State(state): State<AppState>,
    Query(query): Query<BookingFormQuery>,
) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;
    let services = state.cache.cached_services(&state.db).await?;

    let prefilled_city = query.city.clone().unwrap_or_default();
    let prefilled_notes = match &query.city {
        Some(city) => format!("Intervention à {city}"),
        None => String::new(),
    };

    Ok(BookingFormTemplate {
        nav,
        services: services.iter().map(ServiceCard::from_row).collect(),
        preselected_service: query.service.unwrap_or_default(),
        prefilled_city,
        prefilled_notes,
    })
}

/// Editorial page handler
pub async fn page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let nav = site_nav(&state).await?;

    let page = if let Some(cached) = state.cache.pages.get(&slug).await {
        tracing::debug!("Cache HIT for page: {}", slug);
        (*cached).clone()
    } else {
        tracing::debug!("Cache MISS for page: {}", slug);
        let page = db::get_published_page(&state.db, &slug).await?;
        state
            .cache
            .pages
            .insert(slug.clone(), std::sync::Arc::new(page.clone()))
            .await;
        page
    };

    Ok(PageTemplate {
        nav,
        title: page.title,
        content: page.content,
        has_meta_description: page.meta_description.is_some(),
        meta_description: page.meta_description.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
pub struct TestimonialSubmission {
    pub author: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_rating")]
    pub rating: i32,
    pub text: String,
    /// URL of an already-uploaded photo; the upload itself happens against
    /// external storage
    #[serde(default)]
    pub photo_url: Option<String>,
}

fn default_rating() -> i32 {
    5
}

/// Visitor-submitted testimonial; held for moderation
pub async fn submit_testimonial(
    State(state): State<AppState>,
    Json(submission): Json<TestimonialSubmission>,
) -> ApiResult<(StatusCode, Json<TestimonialRow>)> {
    if submission.author.trim().is_empty() || submission.text.trim().is_empty() {
        return Err(AppError::Validation("author and text are required".to_string()).into());
    }
    if !(1..=5).contains(&submission.rating) {
        return Err(AppError::Validation("rating must be between 1 and 5".to_string()).into());
    }

    let row = db::insert_testimonial(
        &state.db,
        &submission.author,
        submission.role.as_deref(),
        submission.rating,
        &submission.text,
        submission.photo_url.as_deref(),
        TESTIMONIAL_PENDING,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

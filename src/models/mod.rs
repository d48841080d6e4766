//! Database models.

pub mod booking;
pub mod content;
pub mod service;

pub use booking::{BookingRow, NewBooking, BOOKING_STATUSES};
pub use content::{
    FaqRow, HeroSettings, MediaRow, NavLink, PageRow, PlanRow, SiteSettingRow, TestimonialRow,
    ZoneRow,
};
pub use service::{OptionChoiceRow, ServiceCatalog, ServiceOption, ServiceOptionRow, ServiceRow};

pub mod config;
pub mod credits;
pub mod error;
pub mod filter;
pub mod frappe;
pub mod grid;
pub mod listing;
pub mod models;
pub mod pagination;
pub mod validation;

pub use config::ClientConfig;
pub use credits::{CreditPackage, PACKAGES, Quote, format_inr, quote};
pub use error::GetProsError;
pub use filter::{FrappeFilters, TrainerFilter};
pub use frappe::{CreditOrder, FrappeClient, TrainerPage};
pub use grid::{
    Controls, GridAdapter, GridEvent, GridView, PageControls, PageFetcher, PaginationMode, ViewAll,
};
pub use listing::{EditOutcome, Idx, IdxGenerator, Indexed, new_idx};
pub use models::{CaseStudy, DeliveryMode, Trainer, Workshop};
pub use pagination::{
    DEFAULT_DELTA, PageLink, PageRequest, PageView, PaginatedGrid, PaginatedView, clamp_page,
    compute_page_numbers, total_pages,
};
pub use validation::{
    CompanyRegistrationForm, FieldError, LoginForm, SignupForm, TrainerProfileForm, Validate,
    ValidationErrors,
};

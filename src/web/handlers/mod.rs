//! # Web API Request Handlers
//!
//! One module per resource, mirroring the route tree under `/api`.

pub mod assistance_requests;
pub mod auth;
pub mod event_contributions;
pub mod event_types;
pub mod events;
pub mod family_meetings;
pub mod fund_transactions;
pub mod health;
pub mod meeting_attendances;
pub mod member_categories;
pub mod member_category_users;
pub mod monthly_contributions;
pub mod notifications;
pub mod profiles;
pub mod sanctions;
pub mod settings;
pub mod users;

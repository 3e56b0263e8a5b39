//! Services - use cases that sequence port calls.
//!
//! Each method performs its steps one after another and stops at the first
//! failure. Nothing is retried or rolled back; multi-step writes report which
//! step failed through the error variant.

mod account;
mod assist;
mod blogs;
mod engagement;

pub use account::{AccountService, AuthSession, Profile, SignupInput};
pub use assist::{
    AssistService, MAX_GENERATED_TAGS, SUMMARY_MAX_CHARS, SUMMARY_MIN_CHARS, parse_tags,
    trim_summary,
};
pub use blogs::{BlogService, BlogView, ListingLimits, ReadOptions, SearchCriteria};
pub use engagement::{EngagementService, LikeOutcome};

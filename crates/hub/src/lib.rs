//! `ajaxgate-hub` — hub bundle download actions.
//!
//! A hub download request carries a list of bundle actions such as
//! `template/landing-page`. Each bundle action is routed through a hub-level
//! channel registry where download actions are registered by wildcard
//! (`template/*`), then the combined outcome flows back into the AJAX channel.

pub mod actions;
pub mod error;
pub mod responders;
pub mod templates;

pub use actions::{BundleAction, DownloadAction, HubActionRegistry, hub_action_registry};
pub use error::HubError;
pub use responders::{
    BUNDLE_ACTIONS_FIELD, HubActionsResponder, HubTemplatesListResponder, register,
};
pub use templates::{HubTemplatesBundle, HubTemplatesDownloadAction, Template, TemplateLibrary};

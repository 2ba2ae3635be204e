//! Genma
//!
//! Chainable node sets over a live DOM, markup rendering with escaped
//! interpolation, a reactive value wire and a few UI utilities.
//!
//! ```
//! use genma::Dom;
//!
//! let dom = Dom::parse("<ul id='list'></ul>");
//! dom.select("#list").render_list(&["a", "<b>"], |item, _| genma::html!("<li>{}</li>", item));
//! assert_eq!(dom.select("#list").html().as_deref(), Some("<li>a</li><li>&lt;b&gt;</li>"));
//! ```

mod config;
mod dom;
mod element;
pub mod escape;
mod node_set;
mod render;
mod util;
mod wire;

pub use config::Config;
pub use dom::{Dom, WeakDom};
pub use element::ElementRef;
pub use escape::{escape_html, render_template};
pub use node_set::{CssPayload, NodeSet, Target};
pub use util::{click_outside, Debounce, Subscription};
pub use wire::{OnChange, Wire};

pub use genma_dom::{Event, EventListener, NodeId, PropValue};
pub use genma_net as net;

/// Errors surfaced by the fallible entry points
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Css(#[from] genma_css::CssError),

    #[error(transparent)]
    Dom(#[from] genma_dom::DomError),

    #[error(transparent)]
    Request(#[from] genma_net::RequestError),
}

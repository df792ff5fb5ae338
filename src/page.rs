//! The browser seam.
//!
//! Everything the motion layer does to a page goes through [`Page`]: queries,
//! class and style mutation, transient elements, listeners, the intersection
//! observer and audio. `dom::BrowserPage` drives a real document through
//! web-sys; tests drive an in-memory page instead.

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Payload handed to event handlers. Only the fields the handlers read are
/// carried over from the browser event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventInfo {
    pub client_x: f64,
    pub client_y: f64,
    pub message: Option<String>,
}

impl EventInfo {
    pub fn at(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y, message: None }
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<N> {
    Node(N),
    Window,
    Document,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

/// One observer notification for one watched node.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<N> {
    pub target: N,
    pub is_intersecting: bool,
}

pub type Handler = Box<dyn FnMut(&EventInfo)>;
pub type EntriesHandler<N> = Box<dyn FnMut(Vec<Intersection<N>>)>;

/// Audio output opened on demand. Failing to open one disables sound.
pub trait AudioOutput {
    /// Play a tone at `frequency` Hz fading out over `duration` seconds.
    fn tone(&self, frequency: f32, duration: f64) -> Result<()>;
}

pub trait Page {
    type Node: Clone + PartialEq + 'static;
    type Audio: AudioOutput + 'static;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Set one inline style property. Accepts CSS names, custom properties
    /// included; an empty value clears the property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);
    fn set_css_text(&self, node: &Self::Node, css: &str);

    fn create_element(&self, tag: &str) -> Result<Self::Node>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;
    fn append_to_head(&self, node: &Self::Node) -> Result<()>;
    fn append_to_body(&self, node: &Self::Node) -> Result<()>;
    fn remove(&self, node: &Self::Node);
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    /// (clientWidth, clientHeight)
    fn client_size(&self, node: &Self::Node) -> (f64, f64);
    fn viewport_height(&self) -> f64;
    fn document_hidden(&self) -> bool;
    /// `HTMLImageElement.complete`; false for anything that is not an image.
    fn image_complete(&self, node: &Self::Node) -> bool;
    /// Used JS heap in bytes, where the browser exposes it.
    fn heap_used(&self) -> Option<f64>;

    fn listen(&self, target: Target<Self::Node>, event: &str, handler: Handler) -> Result<()>;
    fn observe(
        &self,
        targets: &[Self::Node],
        options: &ObserverOptions,
        on_entries: EntriesHandler<Self::Node>,
    ) -> Result<()>;

    fn open_audio(&self) -> Result<Self::Audio>;

    /// Remove every listener and disconnect every observer registered
    /// through this page. Nothing registered earlier fires afterwards.
    fn teardown(&self);
}

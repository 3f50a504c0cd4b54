//! Scroll overflow affordance.
//!
//! A scrollable element gets a CSS mask fading out each edge it can still
//! scroll toward, so overflow is visible without scrollbars. The mask is
//! one directional gradient per non-arrived edge, composited with
//! intersection semantics, applied as both the standard and the
//! `-webkit-` prefixed properties.
//!
//! The edge computation and mask construction are pure; the browser glue
//! wires them to scroll events, a `ResizeObserver`, and a child-list
//! `MutationObserver`.

/// Default fade thickness.
pub const DEFAULT_FADE_THICKNESS: &str = "100px";

/// Tolerance for sub-pixel scroll positions on scaled displays.
const EDGE_EPSILON: f64 = 1.0;

/// Scroll position and size of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

/// Whether the element is scrolled fully to each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeArrival {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl EdgeArrival {
    pub fn from_metrics(metrics: &ScrollMetrics) -> Self {
        Self {
            left: metrics.scroll_left <= EDGE_EPSILON,
            top: metrics.scroll_top <= EDGE_EPSILON,
            right: metrics.scroll_left + metrics.client_width
                >= metrics.scroll_width - EDGE_EPSILON,
            bottom: metrics.scroll_top + metrics.client_height
                >= metrics.scroll_height - EDGE_EPSILON,
        }
    }

    /// True when no edge overflows.
    pub fn all(&self) -> bool {
        self.left && self.top && self.right && self.bottom
    }
}

/// Builds the mask image for the given arrival state, or `None` when no
/// mask is needed. One gradient per non-arrived edge; fading starts
/// `thickness` in from that edge.
pub fn mask_image(arrival: &EdgeArrival, thickness: &str) -> Option<String> {
    let mut gradients = Vec::with_capacity(4);
    if !arrival.left {
        gradients.push(format!(
            "linear-gradient(to right, transparent, black {})",
            thickness
        ));
    }
    if !arrival.top {
        gradients.push(format!(
            "linear-gradient(to bottom, transparent, black {})",
            thickness
        ));
    }
    if !arrival.right {
        gradients.push(format!(
            "linear-gradient(to left, transparent, black {})",
            thickness
        ));
    }
    if !arrival.bottom {
        gradients.push(format!(
            "linear-gradient(to top, transparent, black {})",
            thickness
        ));
    }

    if gradients.is_empty() {
        None
    } else {
        Some(gradients.join(", "))
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::Scrollable;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{mask_image, EdgeArrival, ScrollMetrics, DEFAULT_FADE_THICKNESS};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Event, HtmlElement, MutationObserver, MutationObserverInit, ResizeObserver};

    /// Handle keeping an element's overflow mask up to date.
    ///
    /// Dropping the handle removes the listeners, disconnects the
    /// observers, and clears the mask.
    pub struct Scrollable {
        element: HtmlElement,
        scroll_listener: Closure<dyn FnMut(Event)>,
        resize_observer: ResizeObserver,
        mutation_observer: MutationObserver,
        // Kept alive for the observers' sake.
        _resize_listener: Closure<dyn FnMut(js_sys::Array)>,
        _mutation_listener: Closure<dyn FnMut(js_sys::Array)>,
    }

    impl Scrollable {
        /// Starts observing the element with the default fade thickness.
        pub fn attach(element: HtmlElement) -> Result<Self, JsValue> {
            Self::attach_with_thickness(element, DEFAULT_FADE_THICKNESS)
        }

        /// Starts observing the element; `thickness` is any CSS length.
        pub fn attach_with_thickness(
            element: HtmlElement,
            thickness: &str,
        ) -> Result<Self, JsValue> {
            let scroll_listener = {
                let element = element.clone();
                let thickness = thickness.to_string();
                Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                    apply_mask(&element, &thickness);
                })
            };
            element.add_event_listener_with_callback(
                "scroll",
                scroll_listener.as_ref().unchecked_ref(),
            )?;

            // Resize and child-list changes both re-evaluate the mask and
            // then synthesize a scroll event so anything else listening
            // for edge state recomputes too.
            let resize_listener = {
                let element = element.clone();
                let thickness = thickness.to_string();
                Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
                    apply_mask(&element, &thickness);
                    dispatch_scroll(&element);
                })
            };
            let resize_observer = ResizeObserver::new(resize_listener.as_ref().unchecked_ref())?;
            resize_observer.observe(&element);

            let mutation_listener = {
                let element = element.clone();
                let thickness = thickness.to_string();
                Closure::<dyn FnMut(js_sys::Array)>::new(move |_records: js_sys::Array| {
                    apply_mask(&element, &thickness);
                    dispatch_scroll(&element);
                })
            };
            let mutation_observer =
                MutationObserver::new(mutation_listener.as_ref().unchecked_ref())?;
            let options = MutationObserverInit::new();
            options.set_child_list(true);
            mutation_observer.observe_with_options(&element, &options)?;

            // Initial evaluation on mount.
            apply_mask(&element, thickness);
            dispatch_scroll(&element);

            Ok(Self {
                element,
                scroll_listener,
                resize_observer,
                mutation_observer,
                _resize_listener: resize_listener,
                _mutation_listener: mutation_listener,
            })
        }
    }

    impl Drop for Scrollable {
        fn drop(&mut self) {
            let _ = self.element.remove_event_listener_with_callback(
                "scroll",
                self.scroll_listener.as_ref().unchecked_ref(),
            );
            self.resize_observer.disconnect();
            self.mutation_observer.disconnect();
            clear_mask(&self.element);
        }
    }

    fn metrics(element: &HtmlElement) -> ScrollMetrics {
        ScrollMetrics {
            scroll_left: element.scroll_left() as f64,
            scroll_top: element.scroll_top() as f64,
            client_width: element.client_width() as f64,
            client_height: element.client_height() as f64,
            scroll_width: element.scroll_width() as f64,
            scroll_height: element.scroll_height() as f64,
        }
    }

    fn apply_mask(element: &HtmlElement, thickness: &str) {
        let arrival = EdgeArrival::from_metrics(&metrics(element));
        let style = element.style();

        match mask_image(&arrival, thickness) {
            Some(mask) => {
                let _ = style.set_property("mask-image", &mask);
                let _ = style.set_property("-webkit-mask-image", &mask);
                let _ = style.set_property("mask-composite", "intersect");
                let _ = style.set_property("-webkit-mask-composite", "source-in");
            }
            None => clear_mask(element),
        }
    }

    fn clear_mask(element: &HtmlElement) {
        let style = element.style();
        let _ = style.remove_property("mask-image");
        let _ = style.remove_property("-webkit-mask-image");
        let _ = style.remove_property("mask-composite");
        let _ = style.remove_property("-webkit-mask-composite");
    }

    fn dispatch_scroll(element: &HtmlElement) {
        if let Ok(event) = Event::new("scroll") {
            let _ = element.dispatch_event(&event);
        }
    }
}

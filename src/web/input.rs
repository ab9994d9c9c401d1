//! DOM edit widgets.
//!
//! An `<input>` (text cells) or `<select>` (dropdown cells) positioned
//! absolutely over the edited cell. Keyboard handling stays on the JS side,
//! which forwards keys to `XlMatrix::on_key_down`.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::matrix::{CellStyle, EditKind, EditWidget, EditWidgetFactory};
use crate::render::Rect;

use super::canvas::css_font;

enum Element {
    Input(HtmlInputElement),
    Select(HtmlSelectElement),
}

impl Element {
    fn html(&self) -> &HtmlElement {
        match self {
            Self::Input(e) => e.as_ref(),
            Self::Select(e) => e.as_ref(),
        }
    }
}

/// Edit widget backed by a DOM element.
pub(crate) struct DomEditWidget {
    element: Option<Element>,
    visible: bool,
}

impl DomEditWidget {
    fn create(document: &Document, container: Option<&HtmlElement>, kind: EditKind) -> Self {
        let tag = match kind {
            EditKind::Text => "input",
            EditKind::Dropdown => "select",
        };
        let element = document.create_element(tag).ok().and_then(|el| match kind {
            EditKind::Text => el.dyn_into::<HtmlInputElement>().ok().map(|input| {
                input.set_type("text");
                Element::Input(input)
            }),
            EditKind::Dropdown => el.dyn_into::<HtmlSelectElement>().ok().map(Element::Select),
        });
        if let Some(el) = &element {
            let html = el.html();
            let style = html.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("z-index", "1000");
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("border", "1px solid #000");
            let _ = style.set_property("outline", "none");
            let _ = style.set_property("padding", "0 2px");
            let _ = style.set_property("margin", "0");
            let _ = style.set_property("display", "none");
            if let Some(c) = container {
                let _ = c.append_child(html);
            } else if let Some(body) = document.body() {
                let _ = body.append_child(html);
            }
        }
        Self {
            element,
            visible: false,
        }
    }

    fn place(&self, rect: Rect) {
        let Some(el) = &self.element else {
            return;
        };
        let style = el.html().style();
        let _ = style.set_property("left", &format!("{}px", rect.x));
        let _ = style.set_property("top", &format!("{}px", rect.y));
        let _ = style.set_property("width", &format!("{}px", rect.w));
        let _ = style.set_property("height", &format!("{}px", rect.h));
    }
}

impl EditWidget for DomEditWidget {
    fn show(&mut self, rect: Rect, value: &str, style: &CellStyle) {
        self.place(rect);
        self.set_value(value);
        let Some(el) = &self.element else {
            return;
        };
        let html = el.html();
        let css = html.style();
        let _ = css.set_property("display", "block");
        let _ = css.set_property("font", &css_font(&style.font));
        let _ = css.set_property("background", &style.bg.to_hex());
        let _ = css.set_property("color", &style.fg.to_hex());
        let _ = html.focus();
        if let Element::Input(input) = el {
            input.select();
        }
        self.visible = true;
    }

    fn set_items(&mut self, items: &[String]) {
        let Some(Element::Select(select)) = &self.element else {
            return;
        };
        select.set_length(0);
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for item in items {
            let Ok(option) = document.create_element("option") else {
                continue;
            };
            option.set_text_content(Some(item));
            let _ = option.set_attribute("value", item);
            let _ = select.append_child(&option);
        }
    }

    fn set_rect(&mut self, rect: Rect) {
        self.place(rect);
    }

    fn hide(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.html().style().set_property("display", "none");
            let _ = el.html().blur();
        }
        self.visible = false;
    }

    fn value(&self) -> String {
        match &self.element {
            Some(Element::Input(input)) => input.value(),
            Some(Element::Select(select)) => select.value(),
            None => String::new(),
        }
    }

    fn set_value(&mut self, value: &str) {
        match &self.element {
            Some(Element::Input(input)) => input.set_value(value),
            Some(Element::Select(select)) => select.set_value(value),
            None => {}
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Drop for DomEditWidget {
    fn drop(&mut self) {
        if let Some(el) = &self.element {
            let html = el.html();
            if let Some(parent) = html.parent_node() {
                let _ = parent.remove_child(html);
            }
        }
    }
}

/// Creates DOM widgets inside `container` (or the document body).
pub(crate) struct DomEditFactory {
    container: Option<HtmlElement>,
}

impl DomEditFactory {
    pub(crate) fn new(container: Option<HtmlElement>) -> Self {
        Self { container }
    }
}

impl EditWidgetFactory for DomEditFactory {
    fn create(&self, kind: EditKind) -> Box<dyn EditWidget> {
        let document = web_sys::window().and_then(|w| w.document());
        match document {
            Some(document) => Box::new(DomEditWidget::create(
                &document,
                self.container.as_ref(),
                kind,
            )),
            None => Box::new(DomEditWidget {
                element: None,
                visible: false,
            }),
        }
    }
}

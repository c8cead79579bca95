use std::collections::BTreeMap;

use super::selector::{Matchable, SelectorList};
use super::{ElementId, Rect, Surface, Viewport};
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    /// Document coordinates, or viewport coordinates when `fixed`
    rect: Rect,
    fixed: bool,
    attached: bool,
}

impl Matchable for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Builder for elements added to a [`MemorySurface`]
#[derive(Debug, Clone)]
pub struct ElementSpec {
    element: Element,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            element: Element {
                tag: tag.to_ascii_lowercase(),
                attrs: BTreeMap::new(),
                classes: Vec::new(),
                styles: BTreeMap::new(),
                text: String::new(),
                value: String::new(),
                rect: Rect::default(),
                fixed: false,
                attached: true,
            },
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.element.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.element.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.element.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.element.value = value.to_string();
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.element.rect = Rect::new(x, y, width, height);
        self
    }

    /// Position relative to the viewport instead of the document
    pub fn fixed(mut self) -> Self {
        self.element.fixed = true;
        self
    }
}

/// In-memory page used by the terminal preview, the simulator and tests
#[derive(Debug, Clone)]
pub struct MemorySurface {
    elements: Vec<Element>,
    viewport: Viewport,
    document_height: f64,
}

impl MemorySurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            viewport: Viewport { width, height, scroll_y: 0.0 },
            document_height: height,
        }
    }

    /// Add an element; the document grows to contain it
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let element = spec.element;
        if !element.fixed {
            self.document_height = self.document_height.max(element.rect.bottom());
        }
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        let y = self.viewport.scroll_y;
        self.scroll_to(y);
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Attached elements in document order
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached)
            .map(|(i, _)| ElementId(i))
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).ok().map(|e| e.tag.as_str())
    }

    pub fn classes(&self, id: ElementId) -> Vec<String> {
        self.get(id).map(|e| e.classes.clone()).unwrap_or_default()
    }

    /// Box in document coordinates (viewport coordinates for fixed elements)
    pub fn layout_rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).ok().map(|e| e.rect)
    }

    pub fn is_fixed(&self, id: ElementId) -> bool {
        self.get(id).map(|e| e.fixed).unwrap_or(false)
    }

    fn get(&self, id: ElementId) -> Result<&Element> {
        self.elements
            .get(id.0)
            .filter(|e| e.attached)
            .ok_or(Error::ElementNotFound(id))
    }

    fn get_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements
            .get_mut(id.0)
            .filter(|e| e.attached)
            .ok_or(Error::ElementNotFound(id))
    }
}

impl Surface for MemorySurface {
    fn query(&self, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached && list.matches(*e))
            .map(|(i, _)| ElementId(i))
            .collect())
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) -> Result<()> {
        let element = self.get_mut(id)?;
        let present = element.classes.iter().position(|c| c == class);
        match (present, on) {
            (None, true) => element.classes.push(class.to_string()),
            (Some(index), false) => {
                element.classes.remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).map(|e| e.has_class(class)).unwrap_or(false)
    }

    fn set_style(&mut self, id: ElementId, property: &str, value: &str) -> Result<()> {
        self.get_mut(id)?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn style(&self, id: ElementId, property: &str) -> Option<String> {
        self.get(id).ok()?.styles.get(property).cloned()
    }

    fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.get(id).ok()?.attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, id: ElementId, name: &str, value: Option<&str>) -> Result<()> {
        let element = self.get_mut(id)?;
        match value {
            Some(value) => {
                element.attrs.insert(name.to_string(), value.to_string());
            }
            None => {
                element.attrs.remove(name);
            }
        }
        Ok(())
    }

    fn text(&self, id: ElementId) -> Result<String> {
        Ok(self.get(id)?.text.clone())
    }

    fn set_text(&mut self, id: ElementId, text: &str) -> Result<()> {
        self.get_mut(id)?.text = text.to_string();
        Ok(())
    }

    fn value(&self, id: ElementId) -> Result<String> {
        Ok(self.get(id)?.value.clone())
    }

    fn set_value(&mut self, id: ElementId, value: &str) -> Result<()> {
        self.get_mut(id)?.value = value.to_string();
        Ok(())
    }

    fn bounding_box(&self, id: ElementId) -> Result<Rect> {
        let element = self.get(id)?;
        let mut rect = element.rect;
        if !element.fixed {
            rect.y -= self.viewport.scroll_y;
        }
        Ok(rect)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, y: f64) {
        let y = if y.is_finite() { y } else { 0.0 };
        self.viewport.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    fn create(&mut self, tag: &str, classes: &[&str]) -> ElementId {
        let spec = classes
            .iter()
            .fold(ElementSpec::new(tag).fixed(), |spec, class| spec.class(class));
        self.add(spec)
    }

    fn remove(&mut self, id: ElementId) -> Result<()> {
        self.get_mut(id)?.attached = false;
        Ok(())
    }

    fn is_attached(&self, id: ElementId) -> bool {
        self.get(id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> MemorySurface {
        let mut surface = MemorySurface::new(800.0, 600.0);
        surface.add(ElementSpec::new("section").id("top").rect(0.0, 0.0, 800.0, 1000.0));
        surface.add(
            ElementSpec::new("div")
                .class("reveal")
                .rect(0.0, 1200.0, 800.0, 200.0),
        );
        surface
    }

    #[test]
    fn test_query_and_remove() {
        let mut surface = surface();
        let reveals = surface.query(".reveal").unwrap();
        assert_eq!(reveals.len(), 1);

        surface.remove(reveals[0]).unwrap();
        assert!(surface.query(".reveal").unwrap().is_empty());
        assert!(matches!(
            surface.set_text(reveals[0], "x"),
            Err(Error::ElementNotFound(_))
        ));
        assert!(!surface.is_attached(reveals[0]));
    }

    #[test]
    fn test_bounding_box_follows_scroll() {
        let mut surface = surface();
        let id = surface.query_one(".reveal").unwrap().unwrap();
        assert_eq!(surface.bounding_box(id).unwrap().top(), 1200.0);

        surface.scroll_to(500.0);
        assert_eq!(surface.bounding_box(id).unwrap().top(), 700.0);
        assert_eq!(surface.offset_top(id).unwrap(), 1200.0);
    }

    #[test]
    fn test_scroll_clamped_to_document() {
        let mut surface = surface();
        assert_eq!(surface.document_height(), 1400.0);

        surface.scroll_to(5000.0);
        assert_eq!(surface.viewport().scroll_y, 800.0);
        surface.scroll_to(-20.0);
        assert_eq!(surface.viewport().scroll_y, 0.0);
    }

    #[test]
    fn test_class_toggle_is_idempotent() {
        let mut surface = surface();
        let id = surface.query_one("#top").unwrap().unwrap();
        surface.set_class(id, "active", true).unwrap();
        surface.set_class(id, "active", true).unwrap();
        assert_eq!(surface.classes(id), vec!["active".to_string()]);
        surface.set_class(id, "active", false).unwrap();
        assert!(!surface.has_class(id, "active"));
    }

    #[test]
    fn test_created_elements_are_fixed() {
        let mut surface = surface();
        surface.scroll_to(300.0);
        let toast = surface.create("div", &["notification", "notification-info"]);
        assert!(surface.has_class(toast, "notification-info"));
        assert_eq!(surface.bounding_box(toast).unwrap().top(), 0.0);
    }
}

//! Typed shapes over the elements of a document.
//!
//! Each shape is a thin wrapper over a [`Node`], so the attributes written through a shape are
//! the attributes of the element. Common behaviour comes from the [`Shape`], [`Positioned`] and
//! [`Dimensioned`] traits.
use std::fmt::Display;

use itertools::Itertools;
use svgdoc_ast::{error::TreeError, Document, Node};

use crate::style::{Property, Style};

const TRANSFORM_SEPARATOR: char = ' ';

macro_rules! define_events {
    ($($variant:ident: $attr:literal,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        /// A scriptable event of a shape
        pub enum Event {
            $(#[doc = concat!("The `", $attr, "` handler")] $variant,)+
        }

        impl Event {
            /// The name of the attribute holding the event's script
            pub fn attribute(self) -> &'static str {
                match self {
                    $(Self::$variant => $attr,)+
                }
            }
        }
    };
}

define_events! {
    Click: "onclick",
    FocusIn: "onfocusin",
    FocusOut: "onfocusout",
    Activate: "onactivate",
    MouseDown: "onmousedown",
    MouseUp: "onmouseup",
    MouseOver: "onmouseover",
    MouseMove: "onmousemove",
    MouseOut: "onmouseout",
}

/// Behaviour shared by every shape
pub trait Shape {
    /// The element of the shape
    fn node(&self) -> &Node;

    /// Returns the `id` of the shape
    fn id(&self) -> String {
        self.node().id()
    }

    /// Sets the `id` of the shape, generating one when none is given and the document
    /// generates ids
    fn set_id(&self, id: Option<&str>) {
        self.node().set_id(id);
    }

    /// Returns the parsed `style` attribute
    fn style(&self) -> Style {
        Style::from(self.node().get_attribute("style").as_str())
    }

    /// Replaces the `style` attribute. An empty style removes it.
    fn set_style(&self, style: &Style) {
        self.node().set_attribute("style", &style.to_string());
    }

    /// Sets the `style` attribute and returns the shape
    #[must_use]
    fn with_style(self, style: &Style) -> Self
    where
        Self: Sized,
    {
        self.set_style(style);
        self
    }

    /// Sets `display:inline` in the style
    fn show(&self) {
        let mut style = self.style();
        style.show();
        self.set_style(&style);
    }

    /// Sets `display:none` in the style
    fn hide(&self) {
        let mut style = self.style();
        style.hide();
        self.set_style(&style);
    }

    /// Returns the `transform` attribute
    fn transform(&self) -> String {
        self.node().get_attribute("transform")
    }

    /// Returns each transformation of the `transform` attribute
    fn transform_list(&self) -> Vec<String> {
        self.transform()
            .split(TRANSFORM_SEPARATOR)
            .filter(|transform| !transform.is_empty())
            .map(String::from)
            .collect()
    }

    /// Replaces the `transform` attribute
    fn set_transform(&self, transform: &str) {
        self.node().set_attribute("transform", transform);
    }

    /// Appends a transformation to the `transform` attribute
    fn add_transform(&self, transform: &str) {
        let current = self.transform();
        let current = current.trim();
        if current.is_empty() {
            self.set_transform(transform);
        } else {
            self.set_transform(&format!("{current}{TRANSFORM_SEPARATOR}{transform}"));
        }
    }

    /// Adds `rotate(angle)`, or `rotate(angle,cx,cy)` when both centres are positive
    fn rotate(&self, angle: f64, cx: f64, cy: f64) {
        if cx > 0.0 && cy > 0.0 {
            self.add_transform(&format!("rotate({angle},{cx},{cy})"));
        } else {
            self.add_transform(&format!("rotate({angle})"));
        }
    }

    /// Adds `scale(sx)`, or `scale(sx, sy)` when both factors are positive
    fn scale(&self, sx: f64, sy: f64) {
        if sx > 0.0 && sy > 0.0 {
            self.add_transform(&format!("scale({sx}, {sy})"));
        } else {
            self.add_transform(&format!("scale({sx})"));
        }
    }

    /// Adds `translate(tx)`, or `translate(tx,ty)` when `ty` is positive
    fn translate(&self, tx: f64, ty: f64) {
        if ty > 0.0 {
            self.add_transform(&format!("translate({tx},{ty})"));
        } else {
            self.add_transform(&format!("translate({tx})"));
        }
    }

    /// Adds `skewX(angle)`
    fn skew_x(&self, angle: f64) {
        self.add_transform(&format!("skewX({angle})"));
    }

    /// Adds `skewY(angle)`
    fn skew_y(&self, angle: f64) {
        self.add_transform(&format!("skewY({angle})"));
    }

    /// Adds `matrix(a,b,c,d,e,f)`
    fn matrix(&self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.add_transform(&format!("matrix({a},{b},{c},{d},{e},{f})"));
    }

    /// Sets the script run for the event
    fn set_event(&self, event: Event, script: &str) {
        self.node().set_attribute(event.attribute(), script);
    }

    /// Returns the text of the `<title>` child
    fn title(&self) -> String {
        child_text(self.node(), "title")
    }

    /// Sets the text of the `<title>` child, adding it when missing
    ///
    /// # Errors
    ///
    /// If the shape cannot hold children
    fn set_title(&self, title: &str) -> Result<(), TreeError> {
        set_child_text(self.node(), "title", title)
    }

    /// Returns the text of the `<desc>` child
    fn description(&self) -> String {
        child_text(self.node(), "desc")
    }

    /// Sets the text of the `<desc>` child, adding it when missing
    ///
    /// # Errors
    ///
    /// If the shape cannot hold children
    fn set_description(&self, description: &str) -> Result<(), TreeError> {
        set_child_text(self.node(), "desc", description)
    }
}

fn child_text(node: &Node, name: &str) -> String {
    node.children()
        .into_iter()
        .find(|child| child.local_name() == name)
        .map(|child| child.text_content())
        .unwrap_or_default()
}

fn set_child_text(node: &Node, name: &str, text: &str) -> Result<(), TreeError> {
    let child = match node
        .children()
        .into_iter()
        .find(|child| child.local_name() == name)
    {
        Some(child) => child,
        None => node.append_element(name)?,
    };
    child.set_text_content(text);
    Ok(())
}

/// A shape placed by `x` and `y`
pub trait Positioned: Shape {
    /// Returns the `x` attribute
    fn x(&self) -> String {
        self.node().get_attribute("x")
    }

    /// Sets the `x` attribute
    fn set_x(&self, x: impl Display) {
        self.node().set_attribute("x", &x.to_string());
    }

    /// Returns the `y` attribute
    fn y(&self) -> String {
        self.node().get_attribute("y")
    }

    /// Sets the `y` attribute
    fn set_y(&self, y: impl Display) {
        self.node().set_attribute("y", &y.to_string());
    }
}

/// A shape sized by `width` and `height`
pub trait Dimensioned: Shape {
    /// Returns the `width` attribute
    fn width(&self) -> String {
        self.node().get_attribute("width")
    }

    /// Sets the `width` attribute
    fn set_width(&self, width: impl Display) {
        self.node().set_attribute("width", &width.to_string());
    }

    /// Returns the `height` attribute
    fn height(&self) -> String {
        self.node().get_attribute("height")
    }

    /// Sets the `height` attribute
    fn set_height(&self, height: impl Display) {
        self.node().set_attribute("height", &height.to_string());
    }
}

macro_rules! define_shapes {
    ($(
        $(#[$meta:meta])*
        $name:ident: $tag:literal $(+ $capability:ident)* {
            $(($getter:ident, $setter:ident): $attr:literal,)*
        }
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq)]
            pub struct $name(Node);

            impl $name {
                #[doc = concat!("The local-name of the `<", $tag, ">` element")]
                pub const TAG: &'static str = $tag;

                pub(crate) fn create(document: &Document) -> Self {
                    Self(document.create_element($tag))
                }

                #[doc = concat!("Wraps the node when it's a `<", $tag, ">` element")]
                pub fn from_node(node: Node) -> Option<Self> {
                    (node.is_element() && node.local_name() == $tag).then_some(Self(node))
                }

                $(
                    #[doc = concat!("Returns the `", $attr, "` attribute")]
                    pub fn $getter(&self) -> String {
                        self.0.get_attribute($attr)
                    }

                    #[doc = concat!("Sets the `", $attr, "` attribute")]
                    pub fn $setter(&self, value: impl Display) {
                        self.0.set_attribute($attr, &value.to_string());
                    }
                )*
            }

            impl Shape for $name {
                fn node(&self) -> &Node {
                    &self.0
                }
            }

            $(impl $capability for $name {})*

            impl From<$name> for Node {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )+
    };
}

define_shapes! {
    /// A `<rect>`, optionally with rounded corners
    Rect: "rect" + Positioned + Dimensioned {
        (round, set_round): "rx",
    }
    /// A `<circle>`
    Circle: "circle" {
        (cx, set_cx): "cx",
        (cy, set_cy): "cy",
        (r, set_r): "r",
    }
    /// An `<ellipse>`
    Ellipse: "ellipse" {
        (cx, set_cx): "cx",
        (cy, set_cy): "cy",
        (rx, set_rx): "rx",
        (ry, set_ry): "ry",
    }
    /// A `<line>` between two points
    Line: "line" {
        (x1, set_x1): "x1",
        (y1, set_y1): "y1",
        (x2, set_x2): "x2",
        (y2, set_y2): "y2",
    }
    /// A `<path>` of drawing commands
    Path: "path" {
        (d, set_d): "d",
    }
    /// A `<text>` element
    Text: "text" + Positioned {}
    /// An `<image>`, referencing or embedding a picture
    Image: "image" + Positioned + Dimensioned {}
    /// A `<clipPath>` made of the shapes added to it
    ClipPath: "clipPath" {
        (clip_path_units, set_clip_path_units): "clipPathUnits",
    }
    /// A `<linearGradient>` made of the stops added to it
    LinearGradient: "linearGradient" {
        (x1, set_x1): "x1",
        (y1, set_y1): "y1",
        (x2, set_x2): "x2",
        (y2, set_y2): "y2",
    }
    /// A `<radialGradient>` made of the stops added to it
    RadialGradient: "radialGradient" {
        (cx, set_cx): "cx",
        (cy, set_cy): "cy",
        (r, set_r): "r",
        (fx, set_fx): "fx",
        (fy, set_fy): "fy",
    }
    /// A colour `<stop>` of a gradient
    Stop: "stop" {
        (offset, set_offset): "offset",
    }
    /// A group, `<g>`, of shapes
    Group: "g" {}
}

impl Rect {
    /// Creates a detached rectangle for the document
    pub fn new(
        document: &Document,
        x: impl Display,
        y: impl Display,
        width: impl Display,
        height: impl Display,
        id: Option<&str>,
    ) -> Self {
        let rect = Self::create(document);
        rect.set_x(x);
        rect.set_y(y);
        rect.set_width(width);
        rect.set_height(height);
        rect.set_id(id);
        rect
    }
}

impl Circle {
    /// Creates a detached circle for the document
    pub fn new(
        document: &Document,
        cx: impl Display,
        cy: impl Display,
        r: impl Display,
        id: Option<&str>,
    ) -> Self {
        let circle = Self::create(document);
        circle.set_cx(cx);
        circle.set_cy(cy);
        circle.set_r(r);
        circle.set_id(id);
        circle
    }
}

impl Ellipse {
    /// Creates a detached ellipse for the document
    pub fn new(
        document: &Document,
        cx: impl Display,
        cy: impl Display,
        rx: impl Display,
        ry: impl Display,
        id: Option<&str>,
    ) -> Self {
        let ellipse = Self::create(document);
        ellipse.set_cx(cx);
        ellipse.set_cy(cy);
        ellipse.set_rx(rx);
        ellipse.set_ry(ry);
        ellipse.set_id(id);
        ellipse
    }
}

impl Line {
    /// Creates a detached line for the document
    pub fn new(
        document: &Document,
        x1: impl Display,
        y1: impl Display,
        x2: impl Display,
        y2: impl Display,
        id: Option<&str>,
    ) -> Self {
        let line = Self::create(document);
        line.set_x1(x1);
        line.set_y1(y1);
        line.set_x2(x2);
        line.set_y2(y2);
        line.set_id(id);
        line
    }
}

impl Path {
    /// Creates a detached path for the document
    pub fn new(document: &Document, d: &str, id: Option<&str>) -> Self {
        let path = Self::create(document);
        path.set_d(d);
        path.set_id(id);
        path
    }

    /// Creates a detached path from a list of commands, such as `["M0 0", "L10 10", "Z"]`
    pub fn from_commands<I>(document: &Document, commands: I, id: Option<&str>) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Self::new(document, &commands.into_iter().join(" "), id)
    }
}

impl Text {
    /// Creates a detached text element for the document
    pub fn new(
        document: &Document,
        x: impl Display,
        y: impl Display,
        text: &str,
        id: Option<&str>,
    ) -> Self {
        let element = Self::create(document);
        element.set_x(x);
        element.set_y(y);
        element.set_id(id);
        element.set_text(text);
        element
    }

    /// Returns the text content
    pub fn text(&self) -> String {
        self.0.text_content()
    }

    /// Replaces the children with the given text
    pub fn set_text(&self, text: &str) {
        self.0.set_text_content(text);
    }
}

impl ClipPath {
    /// Creates a detached clip-path for the document
    pub fn new(document: &Document, id: Option<&str>) -> Self {
        let clip_path = Self::create(document);
        clip_path.set_id(id);
        clip_path
    }

    /// Appends a shape to the clip-path. A shape of another document is copied.
    ///
    /// # Errors
    ///
    /// If the shape is the clip-path or one of it's ancestors
    pub fn add_shape(&self, shape: &impl Shape) -> Result<Node, TreeError> {
        self.0.append_child(shape.node())
    }
}

impl Group {
    /// Creates a detached group for the document
    pub fn new(document: &Document, id: Option<&str>) -> Self {
        let group = Self::create(document);
        group.set_id(id);
        group
    }

    /// Appends a shape to the group. A shape of another document is copied.
    ///
    /// # Errors
    ///
    /// If the shape is the group or one of it's ancestors
    pub fn add_shape(&self, shape: &impl Shape) -> Result<Node, TreeError> {
        self.0.append_child(shape.node())
    }
}

impl LinearGradient {
    /// Creates a detached linear gradient for the document
    pub fn new(document: &Document, id: Option<&str>) -> Self {
        let gradient = Self::create(document);
        gradient.set_id(id);
        gradient
    }

    /// Appends a stop to the gradient
    ///
    /// # Errors
    ///
    /// If the stop cannot be appended
    pub fn add_stop(&self, stop: &Stop) -> Result<Node, TreeError> {
        self.0.append_child(stop.node())
    }
}

impl RadialGradient {
    /// Creates a detached radial gradient for the document
    pub fn new(document: &Document, id: Option<&str>) -> Self {
        let gradient = Self::create(document);
        gradient.set_id(id);
        gradient
    }

    /// Appends a stop to the gradient
    ///
    /// # Errors
    ///
    /// If the stop cannot be appended
    pub fn add_stop(&self, stop: &Stop) -> Result<Node, TreeError> {
        self.0.append_child(stop.node())
    }
}

impl Stop {
    /// Creates a detached gradient stop for the document
    pub fn new(document: &Document, offset: impl Display, color: &str, id: Option<&str>) -> Self {
        let stop = Self::create(document);
        stop.set_offset(offset);
        stop.set_id(id);
        stop.set_color(color);
        stop
    }

    /// Returns the `stop-color` of the style
    pub fn color(&self) -> String {
        self.style_property(Property::StopColor)
    }

    /// Sets the `stop-color` of the style
    pub fn set_color(&self, color: &str) {
        self.set_style_property(Property::StopColor, color);
    }

    /// Returns the `stop-opacity` of the style
    pub fn opacity(&self) -> String {
        self.style_property(Property::StopOpacity)
    }

    /// Sets the `stop-opacity` of the style
    pub fn set_opacity(&self, opacity: impl Display) {
        self.set_style_property(Property::StopOpacity, &opacity.to_string());
    }

    fn style_property(&self, property: Property) -> String {
        self.style().get(property).unwrap_or_default().to_string()
    }

    fn set_style_property(&self, property: Property, value: &str) {
        let mut style = self.style();
        style.set(property, value);
        self.set_style(&style);
    }
}

#[cfg(test)]
use svgdoc_ast::{serialize::Options, DocumentOptions};

#[test]
fn rect_and_circle() -> anyhow::Result<()> {
    let document = Document::new();
    let rect = Rect::new(&document, 10, 10, 50, 20, None);
    let circle = Circle::new(&document, 40, 40, 15, Some("dot"));
    document.add_shape(rect.node())?;
    document.add_shape(circle.node())?;

    insta::assert_snapshot!(document.to_xml(Options::default())?, @r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg" width="210mm" height="297mm" version="1.1"><rect x="10" y="10" width="50" height="20" id="rect0"/><circle cx="40" cy="40" r="15" id="dot"/></svg>
    "#);
    assert_eq!(
        Rect::from_node(document.root().children()[0].clone()).map(|rect| rect.width()),
        Some("50".into())
    );
    assert_eq!(Circle::from_node(document.root()), None);
    Ok(())
}

#[test]
fn transforms() {
    let document = Document::with_options(DocumentOptions {
        auto_id: false,
        ..DocumentOptions::default()
    });
    let rect = Rect::new(&document, 0, 0, 1, 1, None);
    rect.rotate(45.0, 0.0, 10.0);
    rect.rotate(30.0, 5.0, 5.5);
    rect.scale(2.0, 0.0);
    rect.scale(2.0, 3.0);
    rect.translate(10.0, 0.0);
    rect.translate(10.0, 20.0);
    rect.skew_x(1.5);
    rect.skew_y(-2.0);
    rect.matrix(1.0, 0.0, 0.0, 1.0, 5.0, 5.0);
    assert_eq!(
        rect.transform(),
        "rotate(45) rotate(30,5,5.5) scale(2) scale(2, 3) translate(10) translate(10,20) skewX(1.5) skewY(-2) matrix(1,0,0,1,5,5)"
    );
    assert_eq!(rect.transform_list().len(), 10, "`scale(2, 3)` contains the separator");
    assert_eq!(rect.id(), "");

    rect.set_transform("");
    rect.translate(1.0, 0.0);
    assert_eq!(rect.transform_list(), vec!["translate(1)"]);
}

#[test]
fn style_and_events() -> anyhow::Result<()> {
    let document = Document::new();
    let mut style = Style::new();
    style.set_fill(Style::url("gradient"));
    let circle = Circle::new(&document, 1, 1, 1, Some("c")).with_style(&style);
    circle.hide();
    assert_eq!(circle.style().display.as_deref(), Some("none"));
    circle.show();
    circle.set_event(Event::Click, "alert(1)");

    assert_eq!(
        circle.node().to_string(),
        r#"<circle xmlns="http://www.w3.org/2000/svg" cx="1" cy="1" r="1" id="c" style="fill:url(#gradient);display:inline;" onclick="alert(1)"/>"#
    );

    circle.set_style(&Style::new());
    assert!(!circle.node().has_attribute("style"));
    Ok(())
}

#[test]
fn title_and_description() -> anyhow::Result<()> {
    let document = Document::new();
    let group = Group::new(&document, Some("g"));
    assert_eq!(group.title(), "");
    group.set_title("first")?;
    group.set_title("second")?;
    group.set_description("a & b")?;
    assert_eq!(group.title(), "second");
    assert_eq!(group.description(), "a & b");
    insta::assert_snapshot!(
        group.node().to_string(),
        @r#"<g xmlns="http://www.w3.org/2000/svg" id="g"><title>second</title><desc>a &amp; b</desc></g>"#
    );
    Ok(())
}

#[test]
fn gradients_and_paths() -> anyhow::Result<()> {
    let document = Document::new();
    let gradient = LinearGradient::new(&document, Some("fade"));
    gradient.set_x2("100%");
    gradient.add_stop(&Stop::new(&document, 0, "red", Some("s0")))?;
    let stop = Stop::new(&document, 1, "blue", Some("s1"));
    stop.set_opacity(0.5);
    gradient.add_stop(&stop)?;
    document.add_defs(gradient.node())?;
    assert_eq!(stop.color(), "blue");
    assert_eq!(stop.opacity(), "0.5");

    let clip = ClipPath::new(&document, Some("clip"));
    clip.add_shape(&Path::from_commands(&document, ["M0 0", "L10 10", "Z"], Some("p")))?;
    clip.add_shape(&Ellipse::new(&document, 5, 5, 2, 1, Some("e")))?;
    document.add_defs(clip.node())?;

    let defs = document.defs().ok_or(anyhow::anyhow!("missing <defs>"))?;
    insta::assert_snapshot!(defs.to_string(), @r#"<defs xmlns="http://www.w3.org/2000/svg"><linearGradient id="fade" x2="100%"><stop offset="0" id="s0" style="stop-color:red;"/><stop offset="1" id="s1" style="stop-color:blue;stop-opacity:0.5;"/></linearGradient><clipPath id="clip"><path d="M0 0 L10 10 Z" id="p"/><ellipse cx="5" cy="5" rx="2" ry="1" id="e"/></clipPath></defs>"#);
    Ok(())
}

#[test]
fn shapes_from_other_documents_are_copied() -> anyhow::Result<()> {
    let document = Document::new();
    let other = Document::new();
    let line = Line::new(&other, 0, 0, 10, 10, Some("l"));
    let group = Group::new(&document, Some("g"));
    let copy = group.add_shape(&line)?;
    assert!(!copy.ptr_eq(line.node()));
    line.set_x1(5);
    assert_eq!(copy.get_attribute("x1"), "0");

    let text = Text::new(&document, 1, 2, "hello", Some("t"));
    assert!(group.add_shape(&text).is_ok());
    assert_eq!(text.text(), "hello");
    assert!(matches!(
        text.node().append_child(group.node()),
        Err(TreeError::HierarchyRequest)
    ));
    Ok(())
}

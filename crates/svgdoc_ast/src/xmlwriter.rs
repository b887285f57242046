/*!

A copy of the [xmlwriter](https://docs.rs/xmlwriter/latest/xmlwriter/index.html) crate, except with some slight modifications.

- Errors instead of panicking
- Writes the UTF-8 xml declaration on it's own line
- Escapes whitespace characters of attribute values as character references

---

A simple, streaming, partially-validating XML writer that writes XML data to a
`std::io::Write` implementation.

### Example

```rust
use svgdoc_ast::xmlwriter::*;

fn main() -> Result {
    let opt = Options {
        indent: Indent::Spaces(2),
        ..Options::default()
    };

    let mut w = XmlWriter::new(Vec::<u8>::new(), opt);
    w.start_element("svg")?;
    w.write_attribute("xmlns", "http://www.w3.org/2000/svg")?;
    w.write_attribute_fmt("viewBox", format_args!("{} {} {} {}", 0, 0, 128, 128))?;
    w.start_element("rect")?;
    w.write_attribute("x", &10)?;

    assert_eq!(std::str::from_utf8(w.end_document()?.as_slice())
        .expect("xmlwriter always writes valid UTF-8"),
"<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 128 128\">
  <rect x=\"10\"/>
</svg>
"
    );
    Ok(())
}
```
*/

use std::fmt::{self, Display, Write as FmtWrite};
use std::io::{self, Write};
use std::result;

/// A result from serializing a document.
pub type Result = result::Result<(), Error>;

/// An error while serializing a document.
#[derive(Debug)]
pub enum Error {
    /// An error while running an io operation.
    IO(io::Error),
    /// An error after writing to string.
    UTF8(std::string::FromUtf8Error),
    /// Did not have opening element name when closing element.
    ClosedUnopenedElement,
    /// Attempted to write attribute before `start_element()` or after `close_element()`.
    AttributeWrittenBeforeElement,
    /// Declaration was already written.
    DeclarationAlreadyWritten,
    /// Attempts to write text before `start_element()`.
    TextBeforeElement,
}

/// An XML node indention.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Indent {
    /// Disable indention and new lines.
    None,
    /// Indent with spaces. Preferred range is 0..4.
    Spaces(u8),
    /// Indent with tabs.
    Tabs,
}

/// An XML writing options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Set XML nodes indention.
    ///
    /// # Examples
    ///
    /// `Indent::None`
    /// Before:
    ///
    /// ```text
    /// <svg>
    ///     <rect fill="red"/>
    /// </svg>
    /// ```
    ///
    /// After:
    ///
    /// ```text
    /// <svg><rect fill="red"/></svg>
    /// ```
    ///
    /// Default: `None`
    pub indent: Indent,

    /// Write self-closing tags when element is empty.
    ///
    /// # Examples
    ///
    /// Before:
    ///
    /// ```text
    /// <tag/>
    /// ```
    ///
    /// After:
    ///
    /// ```text
    /// <tag></tag>
    /// ```
    ///
    /// Default: enabled
    pub enable_self_closing: bool,
}

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Options {
            indent: Indent::None,
            enable_self_closing: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum State {
    Empty,
    Declaration,
    Document,
    Attributes,
}

#[derive(Clone, Debug)]
struct DepthData {
    element_name: Option<String>,
    has_children: bool,
}

// Wraps the writer so formatted strings are escaped according to the kind of node being written.
#[derive(Clone, Debug)]
struct FmtWriter<W: Write> {
    writer: W,
    error_kind: Option<io::ErrorKind>,
    escape: Escape,
}

impl<W: Write> FmtWriter<W> {
    fn take_err(&mut self) -> Error {
        let error_kind = self.error_kind.take().unwrap_or(io::ErrorKind::Other);
        Error::IO(io::Error::from(error_kind))
    }

    fn write_escaped(&mut self, s: &str, escape_attribute: bool) -> io::Result<()> {
        let mut part_start_pos = 0;
        for (byte_pos, byte) in s.bytes().enumerate() {
            let escaped_char: Option<&[u8]> = match byte {
                b'&' => Some(b"&amp;"),
                b'>' => Some(b"&gt;"),
                b'<' => Some(b"&lt;"),
                b'"' if escape_attribute => Some(b"&quot;"),
                b'\t' if escape_attribute => Some(b"&#9;"),
                b'\n' if escape_attribute => Some(b"&#10;"),
                b'\r' if escape_attribute => Some(b"&#13;"),
                _ => None,
            };
            if let Some(escaped_char) = escaped_char {
                self.writer
                    .write_all(s[part_start_pos..byte_pos].as_bytes())?;
                self.writer.write_all(escaped_char)?;
                part_start_pos = byte_pos + 1;
            }
        }
        self.writer.write_all(s[part_start_pos..].as_bytes())
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Escape {
    Comment,
    AttributeValue,
    Text,
}

impl<W: Write> fmt::Write for FmtWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let result = match self.escape {
            Escape::AttributeValue => self.write_escaped(s, true),
            Escape::Text => self.write_escaped(s, false),
            // Double hyphens in comments are left as is, libxml2 does the same.
            Escape::Comment => self.writer.write_all(s.as_bytes()),
        };
        result.map_err(|err| {
            self.error_kind = Some(err.kind());
            fmt::Error
        })
    }
}

/// An XML writer.
#[derive(Clone, Debug)]
pub struct XmlWriter<W: Write> {
    // Use `fmt_writer.writer.write_all()` for bytes that never need escaping, otherwise set
    // `fmt_writer.escape` and go through `fmt_writer.write_fmt()`.
    fmt_writer: FmtWriter<W>,
    state: State,
    preserve_whitespaces: bool,
    depth_stack: Vec<DepthData>,
    opt: Options,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a new `XmlWriter`, writing data in the writer.
    #[inline]
    pub fn new(writer: W, opt: Options) -> Self {
        XmlWriter {
            fmt_writer: FmtWriter {
                writer,
                error_kind: None,
                escape: Escape::Text,
            },
            state: State::Empty,
            preserve_whitespaces: false,
            depth_stack: Vec::new(),
            opt,
        }
    }

    /// Writes an XML declaration, followed by a new line.
    ///
    /// `<?xml version="1.0" encoding="UTF-8"?>`
    ///
    /// # Errors
    ///
    /// - When called twice, or after anything else was written.
    #[inline(never)]
    pub fn write_declaration(&mut self) -> Result {
        if self.state != State::Empty {
            return Err(Error::DeclarationAlreadyWritten);
        }

        self.fmt_writer
            .writer
            .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")
            .map_err(Error::IO)?;
        self.state = State::Declaration;

        Ok(())
    }

    /// Writes a comment string.
    ///
    /// # Errors
    ///
    /// When comment is in a bad state or when io fails.
    pub fn write_comment(&mut self, text: &str) -> Result {
        self.write_comment_fmt(format_args!("{text}"))
    }

    /// Writes a formatted comment.
    ///
    /// # Errors
    ///
    /// When comment is in a bad state or when io fails.
    #[inline(never)]
    pub fn write_comment_fmt(&mut self, fmt: fmt::Arguments) -> Result {
        if self.state == State::Attributes {
            self.write_open_element()?;
        }

        if self.state == State::Document {
            self.write_new_line()?;
        }

        self.write_node_indent()?;

        // <!--text-->
        self.fmt_writer
            .writer
            .write_all(b"<!--")
            .map_err(Error::IO)?;
        self.fmt_writer.escape = Escape::Comment;
        self.fmt_writer
            .write_fmt(fmt)
            .map_err(|_| self.fmt_writer.take_err())?;
        self.fmt_writer
            .writer
            .write_all(b"-->")
            .map_err(Error::IO)?;

        self.state = State::Document;

        Ok(())
    }

    /// Starts writing a new element.
    ///
    /// This method writes only the `<tag-name` part.
    ///
    /// # Errors
    ///
    /// When in a bad state or when io fails.
    #[inline(never)]
    pub fn start_element(&mut self, name: &str) -> Result {
        if self.state == State::Attributes {
            self.write_open_element()?;
        }

        if self.state == State::Document {
            self.write_new_line()?;
        }

        self.write_node_indent()?;

        self.fmt_writer.writer.write_all(b"<").map_err(Error::IO)?;
        self.fmt_writer
            .writer
            .write_all(name.as_bytes())
            .map_err(Error::IO)?;

        self.depth_stack.push(DepthData {
            element_name: Some(name.to_owned()),
            has_children: false,
        });

        self.state = State::Attributes;

        Ok(())
    }

    /// Writes an attribute.
    ///
    /// Any occurrence of `&<>"` and of tabs or line-breaks in the value will be escaped.
    ///
    /// # Errors
    ///
    /// - When called before `start_element()`.
    /// - When called after `close_element()`.
    ///
    /// # Example
    ///
    /// ```
    /// use svgdoc_ast::xmlwriter::*;
    ///
    /// fn main() -> Result {
    ///     let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    ///     w.start_element("svg")?;
    ///     w.write_attribute("x", "5")?;
    ///     w.write_attribute("y", &5)?;
    ///     assert_eq!(std::str::from_utf8(w.end_document()?.as_slice())
    ///         .expect("xmlwriter should always produce valid UTF-8"),
    ///         "<svg x=\"5\" y=\"5\"/>",
    ///     );
    ///     Ok(())
    /// }
    /// ```
    pub fn write_attribute<V: Display + ?Sized>(&mut self, name: &str, value: &V) -> Result {
        self.write_attribute_fmt(name, format_args!("{value}"))
    }

    /// Writes a formatted attribute value.
    ///
    /// Any occurrence of `&<>"` and of tabs or line-breaks in the value will be escaped.
    ///
    /// # Errors
    ///
    /// - When called before `start_element()`.
    /// - When called after `close_element()`.
    #[inline(never)]
    pub fn write_attribute_fmt(&mut self, name: &str, fmt: fmt::Arguments) -> Result {
        if self.state != State::Attributes {
            return Err(Error::AttributeWrittenBeforeElement);
        }

        self.fmt_writer
            .writer
            .write_fmt(format_args!(" {name}=\""))
            .map_err(Error::IO)?;
        self.fmt_writer.escape = Escape::AttributeValue;
        self.fmt_writer
            .write_fmt(fmt)
            .map_err(|_| self.fmt_writer.take_err())?;
        self.fmt_writer.writer.write_all(b"\"").map_err(Error::IO)
    }

    /// Sets the preserve whitespaces flag.
    ///
    /// - If set, text nodes will be written as is.
    /// - If not set, text nodes will be indented.
    ///
    /// Can be set at any moment.
    ///
    /// # Example
    ///
    /// ```
    /// use svgdoc_ast::xmlwriter::*;
    ///
    /// fn main() -> Result {
    ///     let opt = Options { indent: Indent::Spaces(2), ..Options::default() };
    ///     let mut w = XmlWriter::new(Vec::<u8>::new(), opt);
    ///     w.start_element("svg")?;
    ///     w.start_element("text")?;
    ///     w.write_text("text")?;
    ///     w.end_element()?;
    ///     w.start_element("text")?;
    ///     w.set_preserve_whitespaces(true);
    ///     w.write_text("text")?;
    ///     w.end_element()?;
    ///     w.set_preserve_whitespaces(false);
    ///     assert_eq!(std::str::from_utf8(w.end_document()?.as_slice())
    ///         .expect("xmlwriter should produce valid UTF-8"),
    /// "<svg>
    ///   <text>
    ///     text
    ///   </text>
    ///   <text>text</text>
    /// </svg>
    /// "
    ///     );
    ///     Ok(())
    /// }
    /// ```
    pub fn set_preserve_whitespaces(&mut self, preserve: bool) {
        self.preserve_whitespaces = preserve;
    }

    /// Whether text nodes are currently written as is.
    pub fn preserve_whitespaces(&self) -> bool {
        self.preserve_whitespaces
    }

    /// Writes a text node.
    ///
    /// See [`write_text_fmt()`] for details.
    ///
    /// [`write_text_fmt()`]: struct.XmlWriter.html#method.write_text_fmt
    ///
    /// # Errors
    ///
    /// - When called not after `start_element()`.
    pub fn write_text<T: Display + ?Sized>(&mut self, text: &T) -> Result {
        self.write_text_fmt(format_args!("{text}"))
    }

    /// Writes a formatted text node.
    ///
    /// `><&` will be escaped.
    ///
    /// # Errors
    ///
    /// - When called not after `start_element()`.
    #[inline(never)]
    pub fn write_text_fmt(&mut self, fmt: fmt::Arguments) -> Result {
        if self.depth_stack.is_empty() {
            return Err(Error::TextBeforeElement);
        }

        if self.state == State::Attributes {
            self.write_open_element()?;
        }

        self.write_new_line()?;
        self.write_node_indent()?;

        self.fmt_writer.escape = Escape::Text;
        self.fmt_writer
            .write_fmt(fmt)
            .map_err(|_| self.fmt_writer.take_err())?;

        self.state = State::Document;

        Ok(())
    }

    /// Closes an open element.
    ///
    /// # Errors
    ///
    /// When in a bad state or when io fails.
    #[inline(never)]
    pub fn end_element(&mut self) -> Result {
        let Some(depth) = self.depth_stack.pop() else {
            return Err(Error::ClosedUnopenedElement);
        };
        let Some(element_name) = depth.element_name else {
            return Err(Error::ClosedUnopenedElement);
        };

        if depth.has_children || !self.opt.enable_self_closing {
            // Close the empty node here as there were no children to close it.
            if !depth.has_children {
                self.fmt_writer.writer.write_all(b">").map_err(Error::IO)?;
            } else {
                self.write_new_line()?;
                self.write_node_indent()?;
            }

            self.fmt_writer
                .writer
                .write_fmt(format_args!("</{element_name}>"))
                .map_err(Error::IO)?;
        } else {
            self.fmt_writer.writer.write_all(b"/>").map_err(Error::IO)?;
        }

        self.state = State::Document;

        Ok(())
    }

    /// Closes all open elements and returns back the writer.
    ///
    /// # Example
    ///
    /// ```
    /// use svgdoc_ast::xmlwriter::*;
    ///
    /// fn main() -> Result {
    ///     let opt = Options { indent: Indent::Spaces(2), ..Options::default() };
    ///     let mut w = XmlWriter::new(Vec::<u8>::new(), opt);
    ///     w.start_element("svg")?;
    ///     w.start_element("g")?;
    ///     w.start_element("rect")?;
    ///     assert_eq!(std::str::from_utf8(w.end_document()?.as_slice())
    ///         .expect("xmlwriter should always produce valid UTF-8"),
    /// "<svg>
    ///   <g>
    ///     <rect/>
    ///   </g>
    /// </svg>
    /// "
    ///     );
    ///     Ok(())
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// When in a bad state or when io fails.
    pub fn end_document(mut self) -> result::Result<W, Error> {
        while !self.depth_stack.is_empty() {
            self.end_element()?;
        }

        self.write_new_line()?;
        self.fmt_writer.writer.flush().map_err(Error::IO)?;

        Ok(self.fmt_writer.writer)
    }

    // Writes the end of the current opening element, so `>`.
    fn write_open_element(&mut self) -> Result {
        if let Some(depth) = self.depth_stack.last_mut() {
            depth.has_children = true;
            self.fmt_writer.writer.write_all(b">").map_err(Error::IO)?;

            self.state = State::Document;
        }
        Ok(())
    }

    fn write_node_indent(&mut self) -> Result {
        if self.preserve_whitespaces {
            return Ok(());
        }
        let indent = match self.opt.indent {
            Indent::None => return Ok(()),
            Indent::Spaces(n) => vec![b' '; n.into()],
            Indent::Tabs => vec![b'\t'],
        };
        for _ in 0..self.depth_stack.len() {
            self.fmt_writer.writer.write_all(&indent).map_err(Error::IO)?;
        }
        Ok(())
    }

    fn write_new_line(&mut self) -> Result {
        if self.opt.indent != Indent::None && !self.preserve_whitespaces {
            self.fmt_writer.writer.write_all(b"\n").map_err(Error::IO)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO(err) => err.fmt(f),
            Self::UTF8(err) => err.fmt(f),
            Self::ClosedUnopenedElement => {
                "Did not have opening element name when closing element.".fmt(f)
            }
            Self::AttributeWrittenBeforeElement => {
                "Attempted to write attribute before `start_element()` or after `close_element()`."
                    .fmt(f)
            }
            Self::TextBeforeElement => "Attempts to write text before `start_element()`.".fmt(f),
            Self::DeclarationAlreadyWritten => "Declaration was already written.".fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(err) => Some(err),
            Self::UTF8(err) => Some(err),
            _ => None,
        }
    }
}

#[test]
fn escapes_attribute_whitespace() -> Result {
    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    w.start_element("desc")?;
    w.write_attribute("title", "a\tb\nc\r\"&")?;
    w.write_text("<tom & \"jerry\">")?;
    let output = String::from_utf8(w.end_document()?).map_err(Error::UTF8)?;
    assert_eq!(
        output,
        "<desc title=\"a&#9;b&#10;c&#13;&quot;&amp;\">&lt;tom &amp; \"jerry\"&gt;</desc>"
    );
    Ok(())
}

#[test]
fn declaration_on_own_line() -> Result {
    for indent in [Indent::None, Indent::Spaces(2)] {
        let mut w = XmlWriter::new(Vec::<u8>::new(), Options { indent, ..Options::default() });
        w.write_declaration()?;
        w.start_element("svg")?;
        assert!(matches!(
            w.write_declaration(),
            Err(Error::DeclarationAlreadyWritten)
        ));
        let output = String::from_utf8(w.end_document()?).map_err(Error::UTF8)?;
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg/>"));
    }
    Ok(())
}

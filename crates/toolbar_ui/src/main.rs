use std::path::PathBuf;
use std::rc::Rc;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::Root;
use gpui_docs_core::{
    Document, Editor, EditorHandle, ElementNode, Node, PluginRegistry, Point, Selection, TextNode,
};
use gpui_docs_toolbar::{EditorRegistry, PrintSurface, ToolbarConfig, parse_font_size};
use gpui_docs_toolbar_ui::{DocsToolbar, parse_hex};

/// "Prints" the document as plain text into the system temp directory.
struct TextPrintSurface {
    registry: EditorRegistry,
    path: PathBuf,
}

impl PrintSurface for TextPrintSurface {
    fn print(&self) {
        let Some(handle) = self.registry.handle() else {
            return;
        };
        let text = plain_text(handle.read().doc());
        match std::fs::write(&self.path, text) {
            Ok(()) => tracing::info!(path = %self.path.display(), "document printed"),
            Err(err) => tracing::warn!(%err, "failed to print document"),
        }
    }
}

fn plain_text(doc: &Document) -> String {
    let mut out = String::new();
    for node in &doc.children {
        match node {
            Node::Element(block) => {
                for child in &block.children {
                    if let Node::Text(leaf) = child {
                        out.push_str(&leaf.text);
                    }
                }
            }
            Node::Void(void) => out.push_str(&format!("[{}]", void.kind)),
            Node::Text(leaf) => out.push_str(&leaf.text),
        }
        out.push('\n');
    }
    out
}

fn demo_document() -> Document {
    Document {
        children: vec![
            Node::heading(1, "Quarterly notes"),
            Node::paragraph("Click a block to select it, then format it from the toolbar."),
            Node::paragraph("Lists, alignment and line height apply to whole blocks."),
        ],
    }
}

/// Read-only rendering of the document; clicking a block selects all of its text.
struct DocumentPreview {
    handle: EditorHandle,
}

impl DocumentPreview {
    fn select_block(&mut self, index: usize, cx: &mut Context<Self>) {
        let Some(Node::Element(block)) = self.handle.read().doc().children.get(index).cloned()
        else {
            return;
        };
        let last = block.children.len().saturating_sub(1);
        let end = match block.children.last() {
            Some(Node::Text(leaf)) => leaf.text.len(),
            _ => 0,
        };
        let selection = Selection::new(
            Point::new(vec![index, 0], 0),
            Point::new(vec![index, last], end),
        );
        self.handle.update(|editor| editor.set_selection(selection));
        cx.notify();
    }

    fn render_leaf(leaf: &TextNode, cx: &App) -> AnyElement {
        let marks = &leaf.marks;
        let theme = cx.theme();
        div()
            .when(marks.bold, |this| this.font_weight(FontWeight::BOLD))
            .when(marks.italic, |this| this.italic())
            .when(marks.underline || marks.link.is_some(), |this| this.underline())
            .when_some(marks.text_color.as_deref().and_then(parse_hex), |this, color| {
                this.text_color(color)
            })
            .when(marks.link.is_some() && marks.text_color.is_none(), |this| {
                this.text_color(theme.blue)
            })
            .when_some(
                marks.highlight_color.as_deref().and_then(parse_hex),
                |this, color| this.bg(color),
            )
            .when_some(marks.font_size.as_deref().and_then(parse_font_size), |this, size| {
                this.text_size(px(size as f32))
            })
            .when_some(marks.font_family.clone(), |this, family| {
                this.font_family(SharedString::from(family))
            })
            .child(leaf.text.clone())
            .into_any_element()
    }

    fn render_block(index: usize, block: &ElementNode, cx: &mut Context<Self>) -> AnyElement {
        let attr = |key: &str| block.attrs.get(key).and_then(|v| v.as_str()).map(String::from);
        let prefix = match block.kind.as_str() {
            "list_item" if attr("list_type").as_deref() == Some("ordered") => {
                format!("{}.", index + 1)
            }
            "list_item" => "•".to_string(),
            "task_item" => {
                let checked = block.attrs.get("checked").and_then(|v| v.as_bool());
                if checked == Some(true) { "☑" } else { "☐" }.to_string()
            }
            _ => String::new(),
        };
        let level = block.attrs.get("level").and_then(|v| v.as_u64());
        let line_height = attr("line_height").and_then(|v| v.parse::<f32>().ok());
        let leaves: Vec<AnyElement> = block
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(leaf) => Some(Self::render_leaf(leaf, cx)),
                _ => None,
            })
            .collect();

        div()
            .id(index)
            .flex()
            .flex_row()
            .flex_wrap()
            .gap(px(6.))
            .w_full()
            .py(px(2.))
            .cursor_pointer()
            .when_some(level, |this, level| {
                this.font_weight(FontWeight::SEMIBOLD)
                    .text_size(px(30. - 3. * level as f32))
            })
            .when_some(line_height, |this, lh| this.line_height(relative(lh)))
            .map(|this| match attr("align").as_deref() {
                Some("center") => this.justify_center(),
                Some("right") => this.justify_end(),
                _ => this,
            })
            .on_click(cx.listener(move |this, _, _, cx| this.select_block(index, cx)))
            .when(!prefix.is_empty(), |this| this.child(prefix))
            .children(leaves)
            .into_any_element()
    }
}

impl Render for DocumentPreview {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let doc = self.handle.read().doc().clone();
        let blocks: Vec<AnyElement> = doc
            .children
            .iter()
            .enumerate()
            .map(|(index, node)| match node {
                Node::Element(block) => Self::render_block(index, block, cx),
                Node::Void(image) => div()
                    .text_color(cx.theme().muted_foreground)
                    .child(format!("[{}]", image.kind))
                    .into_any_element(),
                Node::Text(leaf) => Self::render_leaf(leaf, cx),
            })
            .collect();

        div()
            .flex()
            .flex_col()
            .gap(px(8.))
            .p(px(24.))
            .text_size(px(16.))
            .children(blocks)
    }
}

struct DocsDemo {
    toolbar: Entity<DocsToolbar>,
    preview: Entity<DocumentPreview>,
}

impl DocsDemo {
    fn view(window: &mut Window, cx: &mut App) -> Entity<Self> {
        let handle = EditorHandle::new(Editor::new(
            demo_document(),
            Selection::collapsed(Point::new(vec![1, 0], 0)),
            PluginRegistry::richtext(),
        ));
        let registry = EditorRegistry::with_handle(handle.clone());
        let printer = Rc::new(TextPrintSurface {
            registry: registry.clone(),
            path: std::env::temp_dir().join("gpui-docs-print.txt"),
        });

        cx.new(|cx| {
            let preview = cx.new(|_| DocumentPreview { handle });
            let toolbar =
                DocsToolbar::view(registry, &ToolbarConfig::default(), printer, window, cx);
            cx.observe(&toolbar, |this: &mut Self, _, cx| {
                this.preview.update(cx, |_, cx| cx.notify());
            })
            .detach();
            Self { toolbar, preview }
        })
    }
}

impl Render for DocsDemo {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        div()
            .size_full()
            .flex()
            .flex_col()
            .bg(cx.theme().background)
            .child(self.toolbar.clone())
            .child(self.preview.clone())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Docs Toolbar".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = DocsDemo::view(window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}

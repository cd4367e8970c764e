use std::rc::Rc;

use futures::StreamExt as _;
use gpui::AppContext as _;
use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, Context, ElementId, Entity, FontWeight, Hsla, IntoElement, MouseButton,
    ParentElement, Render, SharedString, Styled, Subscription, Task, Window, div, px, rgb,
};
use gpui_component::ActiveTheme as _;
use gpui_component::Disableable as _;
use gpui_component::Selectable as _;
use gpui_component::Sizable as _;
use gpui_component::button::{Button, ButtonVariants as _};
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::popover::Popover;
use gpui_docs_toolbar::{
    Command, Control, ControlBody, ControlId, ControlView, EditorRegistry, PrintSurface, Toolbar,
    ToolbarConfig, ToolbarItem, dispatch,
};

use crate::button::{
    ToolbarButton, ToolbarDropdownButton, ToolbarSeparator, ToolbarStepper, swatch,
};
use crate::picker::GpuiFilePicker;

/// The standard formatting toolbar as a gpui view.
///
/// Every frame is drawn from [`Toolbar::render`], so what is shown always reflects the editor
/// behind the registry. Registry notifications (handle swaps, edits from anywhere) are drained
/// on a foreground task that re-renders the view.
pub struct DocsToolbar {
    registry: EditorRegistry,
    toolbar: Toolbar,
    picker: Rc<GpuiFilePicker>,
    font_size_input: Entity<InputState>,
    link_input: Entity<InputState>,
    image_url_input: Entity<InputState>,
    _subscriptions: Vec<Subscription>,
    _refresh: Task<()>,
}

impl DocsToolbar {
    pub fn view(
        registry: EditorRegistry,
        config: &ToolbarConfig,
        printer: Rc<dyn PrintSurface>,
        window: &mut Window,
        cx: &mut App,
    ) -> Entity<Self> {
        cx.new(|cx| Self::new(registry, config, printer, window, cx))
    }

    pub fn new(
        registry: EditorRegistry,
        config: &ToolbarConfig,
        printer: Rc<dyn PrintSurface>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let picker = Rc::new(GpuiFilePicker::default());
        let toolbar = Toolbar::standard(config, printer, picker.clone());

        let font_size_input = cx.new(|cx| InputState::new(window, cx));
        let link_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx);
            state.set_placeholder("https://", window, cx);
            state
        });
        let image_url_input = cx.new(|cx| {
            let mut state = InputState::new(window, cx);
            state.set_placeholder("Image URL", window, cx);
            state
        });

        let subscriptions = vec![
            cx.subscribe_in(&font_size_input, window, Self::on_font_size_input),
            cx.subscribe_in(&link_input, window, |this, _, event: &InputEvent, window, cx| {
                if matches!(event, InputEvent::PressEnter { .. }) {
                    this.submit_url(ControlId::Link, window, cx);
                }
            }),
            cx.subscribe_in(&image_url_input, window, |this, _, event: &InputEvent, window, cx| {
                if matches!(event, InputEvent::PressEnter { .. }) {
                    this.submit_url(ControlId::ImageUrl, window, cx);
                }
            }),
        ];

        let mut events = registry.events();
        let refresh = cx.spawn(async move |this, cx| {
            while events.next().await.is_some() {
                if this.update(cx, |_, cx| cx.notify()).is_err() {
                    break;
                }
            }
        });

        Self {
            registry,
            toolbar,
            picker,
            font_size_input,
            link_input,
            image_url_input,
            _subscriptions: subscriptions,
            _refresh: refresh,
        }
    }

    pub fn registry(&self) -> &EditorRegistry {
        &self.registry
    }

    fn press(&mut self, id: ControlId, cx: &mut Context<Self>) {
        match self.toolbar.control(id) {
            Some(Control::Toggle(button)) => button.press(&self.registry),
            Some(Control::Action(button)) => button.press(&self.registry),
            _ => tracing::debug!(?id, "press on a control that is not a button"),
        }
        cx.notify();
    }

    fn select(&mut self, id: ControlId, index: usize, cx: &mut Context<Self>) {
        if let Some(Control::Dropdown(dropdown)) = self.toolbar.control(id) {
            dropdown.select(&self.registry, index);
        }
        cx.notify();
    }

    fn pick_color(&mut self, id: ControlId, color: String, cx: &mut Context<Self>) {
        if let Some(Control::Color(picker)) = self.toolbar.control_mut(id) {
            picker.pick(&self.registry, color);
        }
        cx.notify();
    }

    fn step_font_size(&mut self, increment: bool, cx: &mut Context<Self>) {
        if let Some(Control::FontSize(stepper)) = self.toolbar.control_mut(ControlId::FontSize) {
            if increment {
                stepper.increment(&self.registry);
            } else {
                stepper.decrement(&self.registry);
            }
        }
        cx.notify();
    }

    fn on_font_size_input(
        &mut self,
        input: &Entity<InputState>,
        event: &InputEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let Some(Control::FontSize(stepper)) = self.toolbar.control_mut(ControlId::FontSize) else {
            return;
        };
        match event {
            InputEvent::Change { .. } => {
                let text = input.read(cx).value().to_string();
                // Re-syncing the shown size also reports a change; only real typing edits.
                if stepper.is_editing() || text != stepper.current(&self.registry).to_string() {
                    stepper.input(text);
                }
            }
            InputEvent::PressEnter { .. } | InputEvent::Blur { .. } => {
                stepper.commit(&self.registry);
                cx.notify();
            }
            _ => {}
        }
    }

    fn open_url_dialog(&mut self, id: ControlId, window: &mut Window, cx: &mut Context<Self>) {
        let input = self.url_input(id);
        let Some(Control::UrlInput(dialog)) = self.toolbar.control_mut(id) else {
            return;
        };
        dialog.open(&self.registry);
        let draft = dialog.draft().to_string();
        input.update(cx, |state, cx| state.set_value(draft, window, cx));
    }

    /// Returns whether the dialog accepted the input and closed.
    fn submit_url(&mut self, id: ControlId, window: &mut Window, cx: &mut Context<Self>) -> bool {
        let input = self.url_input(id);
        let text = input.read(cx).value().to_string();
        let Some(Control::UrlInput(dialog)) = self.toolbar.control_mut(id) else {
            return false;
        };
        if !dialog.is_open() {
            dialog.open(&self.registry);
        }
        dialog.input(text);
        let submitted = dialog.submit(&self.registry);
        if submitted {
            input.update(cx, |state, cx| state.set_value("", window, cx));
        }
        cx.notify();
        submitted
    }

    fn close_url_dialog(&mut self, id: ControlId, cx: &mut Context<Self>) {
        if let Some(Control::UrlInput(dialog)) = self.toolbar.control_mut(id) {
            dialog.close();
        }
        cx.notify();
    }

    fn upload_image(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if let Some(Control::ImageUpload(button)) = self.toolbar.control(ControlId::ImageUpload) {
            button.open(&self.registry);
        }
        let this = cx.entity().downgrade();
        self.picker.run_pending(window, cx, move |_, cx| {
            this.update(cx, |_, cx| cx.notify()).ok();
        });
        cx.notify();
    }

    fn url_input(&self, id: ControlId) -> Entity<InputState> {
        match id {
            ControlId::ImageUrl => self.image_url_input.clone(),
            _ => self.link_input.clone(),
        }
    }

    /// Show the editor's size in the stepper field unless the user is typing there.
    fn sync_font_size_input(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(Control::FontSize(stepper)) = self.toolbar.control(ControlId::FontSize) else {
            return;
        };
        if stepper.is_editing() {
            return;
        }
        let shown = stepper.current(&self.registry).to_string();
        if self.font_size_input.read(cx).value().as_ref() != shown {
            self.font_size_input
                .update(cx, |state, cx| state.set_value(shown, window, cx));
        }
    }

    fn render_item(&self, view: ControlView, cx: &mut Context<Self>) -> AnyElement {
        let id = view.id;
        let element_id = element_id(id);
        let tooltip: SharedString = view.label.clone().into();

        match view.body {
            ControlBody::Toggle { active } => ToolbarButton::new(element_id)
                .tooltip(tooltip)
                .selected(active)
                .child(glyph(id))
                .on_click(cx.listener(move |this, _, _, cx| this.press(id, cx)))
                .into_any_element(),
            ControlBody::Action { disabled } => ToolbarButton::new(element_id)
                .tooltip(tooltip)
                .disabled(disabled)
                .child(glyph(id))
                .on_click(cx.listener(move |this, _, _, cx| this.press(id, cx)))
                .into_any_element(),
            ControlBody::Dropdown {
                current,
                selected,
                options,
            } => self.render_dropdown(id, tooltip, current, selected, options, cx),
            ControlBody::Stepper { .. } => ToolbarStepper::new(element_id, &self.font_size_input)
                .on_decrement(cx.listener(|this, _, _, cx| this.step_font_size(false, cx)))
                .on_increment(cx.listener(|this, _, _, cx| this.step_font_size(true, cx)))
                .into_any_element(),
            ControlBody::Color { color, palette, .. } => {
                self.render_color(id, tooltip, color, palette, cx)
            }
            ControlBody::UrlInput { active, .. } => self.render_url_dialog(id, tooltip, active, cx),
            ControlBody::ImageUpload { picking } => ToolbarButton::new(element_id)
                .tooltip(tooltip)
                .disabled(picking)
                .child(glyph(id))
                .on_click(cx.listener(|this, _, window, cx| this.upload_image(window, cx)))
                .into_any_element(),
        }
    }

    fn render_dropdown(
        &self,
        id: ControlId,
        tooltip: SharedString,
        current: String,
        selected: Option<usize>,
        options: Vec<String>,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let toolbar = cx.entity();
        Popover::new(element_id(id))
            .appearance(false)
            .trigger(ToolbarDropdownButton::new(trigger_id(id), current).tooltip(tooltip))
            .content(move |_, _window, cx| {
                let theme = cx.theme();
                let popover = cx.entity();
                let rows = options.iter().enumerate().map(|(index, label)| {
                    let toolbar = toolbar.clone();
                    let popover = popover.clone();
                    let is_selected = selected == Some(index);
                    div()
                        .id(index)
                        .flex()
                        .items_center()
                        .h(px(28.))
                        .px(px(10.))
                        .rounded(px(6.))
                        .text_sm()
                        .cursor_pointer()
                        .when(is_selected, |this| {
                            this.bg(theme.accent).text_color(theme.accent_foreground)
                        })
                        .when(!is_selected, |this| {
                            this.text_color(theme.popover_foreground)
                                .hover(|this| this.bg(theme.accent.alpha(0.4)))
                        })
                        .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                            window.prevent_default();
                            toolbar.update(cx, |this, cx| this.select(id, index, cx));
                            popover.update(cx, |state, cx| state.dismiss(window, cx));
                        })
                        .child(label.clone())
                });
                menu_surface(cx).min_w(px(160.)).children(rows)
            })
            .into_any_element()
    }

    fn render_color(
        &self,
        id: ControlId,
        tooltip: SharedString,
        color: String,
        palette: Vec<String>,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let border = cx.theme().border;
        let toolbar = cx.entity();
        Popover::new(element_id(id))
            .appearance(false)
            .trigger(
                ToolbarButton::new(trigger_id(id))
                    .tooltip(tooltip)
                    .child(glyph(id))
                    .child(swatch(parse_hex(&color), border)),
            )
            .content(move |_, _window, cx| {
                let popover = cx.entity();
                let chips = palette.iter().map(|hex| {
                    let toolbar = toolbar.clone();
                    let popover = popover.clone();
                    let picked = hex.clone();
                    div()
                        .id(SharedString::from(hex.clone()))
                        .p(px(3.))
                        .rounded(px(4.))
                        .cursor_pointer()
                        .when(*hex == color, |this| this.border_1().border_color(border))
                        .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                            window.prevent_default();
                            let picked = picked.clone();
                            toolbar.update(cx, |this, cx| this.pick_color(id, picked, cx));
                            popover.update(cx, |state, cx| state.dismiss(window, cx));
                        })
                        .child(swatch(parse_hex(hex), border))
                });
                menu_surface(cx)
                    .w(px(148.))
                    .flex_row()
                    .flex_wrap()
                    .children(chips)
            })
            .into_any_element()
    }

    fn render_url_dialog(
        &self,
        id: ControlId,
        tooltip: SharedString,
        active: bool,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let toolbar = cx.entity();
        let input = self.url_input(id);
        let trigger = ToolbarButton::new(trigger_id(id))
            .tooltip(tooltip)
            .selected(active)
            .child(glyph(id))
            .on_click(cx.listener(move |this, _, window, cx| this.open_url_dialog(id, window, cx)));

        Popover::new(element_id(id))
            .appearance(false)
            .trigger(trigger)
            .content(move |_, _window, cx| {
                let popover = cx.entity();
                let apply = {
                    let toolbar = toolbar.clone();
                    let popover = popover.clone();
                    Button::new("apply")
                        .ghost()
                        .small()
                        .label("Apply")
                        .on_click(move |_, window, cx| {
                            let done =
                                toolbar.update(cx, |this, cx| this.submit_url(id, window, cx));
                            if done {
                                popover.update(cx, |state, cx| state.dismiss(window, cx));
                            }
                        })
                };
                let cancel = {
                    let toolbar = toolbar.clone();
                    let popover = popover.clone();
                    Button::new("cancel")
                        .ghost()
                        .small()
                        .label("Cancel")
                        .on_click(move |_, window, cx| {
                            toolbar.update(cx, |this, cx| this.close_url_dialog(id, cx));
                            popover.update(cx, |state, cx| state.dismiss(window, cx));
                        })
                };
                let unlink = (id == ControlId::Link && active).then(|| {
                    let toolbar = toolbar.clone();
                    let popover = popover.clone();
                    Button::new("unlink")
                        .ghost()
                        .small()
                        .label("Remove")
                        .on_click(move |_, window, cx| {
                            toolbar.update(cx, |this, cx| {
                                let handle = this.registry.handle();
                                dispatch(handle.as_ref(), Command::SetLink(String::new()));
                                this.close_url_dialog(id, cx);
                            });
                            popover.update(cx, |state, cx| state.dismiss(window, cx));
                        })
                });

                menu_surface(cx)
                    .w(px(280.))
                    .gap(px(6.))
                    .child(Input::new(&input).w_full().small())
                    .child(
                        div()
                            .flex()
                            .flex_row()
                            .justify_end()
                            .gap(px(6.))
                            .children(unlink)
                            .child(cancel)
                            .child(apply),
                    )
            })
            .into_any_element()
    }
}

impl Render for DocsToolbar {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl gpui::IntoElement {
        self.sync_font_size_input(window, cx);

        let items = self.toolbar.render(&self.registry);
        let children: Vec<AnyElement> = items
            .into_iter()
            .map(|item| match item {
                ToolbarItem::Separator => ToolbarSeparator.into_any_element(),
                ToolbarItem::Control(view) => self.render_item(view, cx),
            })
            .collect();

        let theme = cx.theme();
        div()
            .id("docs-toolbar")
            .flex()
            .flex_row()
            .flex_wrap()
            .items_center()
            .gap(px(2.))
            .px(px(8.))
            .py(px(4.))
            .bg(theme.background)
            .border_b_1()
            .border_color(theme.border)
            .children(children)
    }
}

fn menu_surface(cx: &App) -> gpui::Div {
    let theme = cx.theme();
    div()
        .flex()
        .flex_col()
        .p(px(6.))
        .bg(theme.popover)
        .border_1()
        .border_color(theme.border)
        .rounded(theme.radius)
        .shadow_md()
}

fn element_id(id: ControlId) -> ElementId {
    ElementId::Name(format!("docs-toolbar-{id:?}").into())
}

fn trigger_id(id: ControlId) -> ElementId {
    ElementId::NamedChild(Box::new(element_id(id)), "trigger".into())
}

fn glyph(id: ControlId) -> AnyElement {
    let text = match id {
        ControlId::Undo => "↶",
        ControlId::Redo => "↷",
        ControlId::Print => "⎙",
        ControlId::Spellcheck => "abc",
        ControlId::Bold => "B",
        ControlId::Italic => "I",
        ControlId::Underline => "U",
        ControlId::TextColor => "A",
        ControlId::HighlightColor => "H",
        ControlId::Link => "Link",
        ControlId::ImageUpload => "Image",
        ControlId::ImageUrl => "URL",
        ControlId::TaskList => "☑",
        ControlId::RemoveFormatting => "Tx",
        ControlId::FontFamily
        | ControlId::Heading
        | ControlId::FontSize
        | ControlId::TextAlign
        | ControlId::LineHeight
        | ControlId::ListKind => "",
    };
    div()
        .when(id == ControlId::Bold, |this| this.font_weight(FontWeight::BOLD))
        .when(id == ControlId::Italic, |this| this.italic())
        .when(id == ControlId::Underline, |this| this.underline())
        .child(text)
        .into_any_element()
}

/// `#RRGGBB` to a color; anything else is `None`.
pub fn parse_hex(hex: &str) -> Option<Hsla> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(|v| rgb(v).into())
}

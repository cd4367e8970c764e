use std::rc::Rc;

use gpui::InteractiveElement as _;
use gpui::StatefulInteractiveElement as _;
use gpui::prelude::FluentBuilder as _;
use gpui::{
    AnyElement, App, ClickEvent, ElementId, Entity, Hsla, IntoElement, MouseButton, ParentElement,
    Pixels, RenderOnce, SharedString, StyleRefinement, Styled, Window, div, px,
};
use gpui_component::ActiveTheme as _;
use gpui_component::Disableable;
use gpui_component::Selectable;
use gpui_component::StyledExt as _;
use gpui_component::input::{Input, InputState};
use gpui_component::tooltip::Tooltip;

type ClickHandler = Rc<dyn Fn(&ClickEvent, &mut Window, &mut App)>;

/// Flat toolbar button that never takes focus away from the document.
#[derive(IntoElement)]
pub struct ToolbarButton {
    id: ElementId,
    style: StyleRefinement,
    tooltip: Option<SharedString>,
    disabled: bool,
    selected: bool,
    children: Vec<AnyElement>,
    on_click: Option<ClickHandler>,
    justify_between: bool,
    min_width: Pixels,
    padding_x: Pixels,
}

impl ToolbarButton {
    pub fn new(id: impl Into<ElementId>) -> Self {
        Self {
            id: id.into(),
            style: StyleRefinement::default(),
            tooltip: None,
            disabled: false,
            selected: false,
            children: Vec::new(),
            on_click: None,
            justify_between: false,
            min_width: px(28.),
            padding_x: px(6.),
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<SharedString>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn on_click(
        mut self,
        on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_click = Some(Rc::new(on_click));
        self
    }

    pub fn justify_between(mut self) -> Self {
        self.justify_between = true;
        self
    }

    pub fn min_width(mut self, min_width: Pixels) -> Self {
        self.min_width = min_width;
        self
    }
}

impl ParentElement for ToolbarButton {
    fn extend(&mut self, elements: impl IntoIterator<Item = AnyElement>) {
        self.children.extend(elements);
    }
}

impl Styled for ToolbarButton {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl Selectable for ToolbarButton {
    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl Disableable for ToolbarButton {
    fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl RenderOnce for ToolbarButton {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let disabled = self.disabled;
        let clickable = self.on_click.is_some() && !disabled;

        let mut disabled_fg = theme.muted_foreground;
        disabled_fg.a *= 0.6;

        div()
            .id(self.id)
            .flex()
            .items_center()
            .gap(px(6.))
            .h(px(28.))
            .min_w(self.min_width)
            .px(self.padding_x)
            .rounded(px(6.))
            .text_size(px(12.))
            .font_weight(gpui::FontWeight::MEDIUM)
            .bg(theme.transparent)
            .text_color(if disabled { disabled_fg } else { theme.foreground })
            .map(|this| {
                if self.justify_between {
                    this.justify_between()
                } else {
                    this.justify_center()
                }
            })
            .when(!disabled, |this| {
                this.cursor_pointer()
                    .hover(|this| this.bg(theme.muted))
                    .active(|this| this.bg(theme.accent).text_color(theme.accent_foreground))
            })
            .when(self.selected, |this| {
                this.bg(theme.accent).text_color(theme.accent_foreground)
            })
            .refine_style(&self.style)
            .on_mouse_down(MouseButton::Left, move |_, window, cx| {
                if !clickable {
                    cx.stop_propagation();
                    return;
                }
                // Keep the document focused while clicking.
                window.prevent_default();
            })
            .when_some(self.on_click, |this, on_click| {
                this.on_click(move |event, window, cx| {
                    if !clickable {
                        cx.stop_propagation();
                        return;
                    }
                    (on_click)(event, window, cx);
                })
            })
            .children(self.children)
            .when_some(self.tooltip, |this, tooltip| {
                this.tooltip(move |window, cx| Tooltip::new(tooltip.clone()).build(window, cx))
            })
    }
}

/// Button showing the current value of a picker, with a trailing caret.
#[derive(IntoElement)]
pub struct ToolbarDropdownButton {
    id: ElementId,
    label: SharedString,
    tooltip: Option<SharedString>,
    selected: bool,
    min_width: Pixels,
}

impl ToolbarDropdownButton {
    pub fn new(id: impl Into<ElementId>, label: impl Into<SharedString>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tooltip: None,
            selected: false,
            min_width: px(72.),
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<SharedString>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn min_width(mut self, min_width: Pixels) -> Self {
        self.min_width = min_width;
        self
    }
}

impl Selectable for ToolbarDropdownButton {
    fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl RenderOnce for ToolbarDropdownButton {
    fn render(self, window: &mut Window, cx: &mut App) -> impl IntoElement {
        let muted = cx.theme().muted_foreground;
        let mut button = ToolbarButton::new(self.id)
            .justify_between()
            .min_width(self.min_width)
            .selected(self.selected)
            .child(div().truncate().child(self.label))
            .child(div().text_color(muted).child("▾"));
        if let Some(tooltip) = self.tooltip {
            button = button.tooltip(tooltip);
        }
        button.render(window, cx)
    }
}

#[derive(IntoElement)]
pub struct ToolbarSeparator;

impl RenderOnce for ToolbarSeparator {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        div()
            .mx(px(6.))
            .child(div().h(px(18.)).w(px(1.)).bg(cx.theme().border))
    }
}

/// `-` / value / `+` cluster around a text input.
#[derive(IntoElement)]
pub struct ToolbarStepper {
    id: ElementId,
    input: Entity<InputState>,
    on_decrement: Option<ClickHandler>,
    on_increment: Option<ClickHandler>,
}

impl ToolbarStepper {
    pub fn new(id: impl Into<ElementId>, input: &Entity<InputState>) -> Self {
        Self {
            id: id.into(),
            input: input.clone(),
            on_decrement: None,
            on_increment: None,
        }
    }

    pub fn on_decrement(
        mut self,
        on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_decrement = Some(Rc::new(on_click));
        self
    }

    pub fn on_increment(
        mut self,
        on_click: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        self.on_increment = Some(Rc::new(on_click));
        self
    }
}

impl RenderOnce for ToolbarStepper {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let theme = cx.theme();
        let mut bg = theme.muted;
        bg.a *= 0.6;

        let minus_id = ElementId::NamedChild(Box::new(self.id.clone()), "minus".into());
        let plus_id = ElementId::NamedChild(Box::new(self.id.clone()), "plus".into());

        let mut minus = ToolbarButton::new(minus_id).tooltip("Decrease").child("−");
        if let Some(on_click) = self.on_decrement {
            minus = minus.on_click(move |event, window, cx| on_click(event, window, cx));
        }
        let mut plus = ToolbarButton::new(plus_id).tooltip("Increase").child("+");
        if let Some(on_click) = self.on_increment {
            plus = plus.on_click(move |event, window, cx| on_click(event, window, cx));
        }

        div()
            .id(self.id)
            .flex()
            .items_center()
            .gap(px(2.))
            .rounded(px(6.))
            .bg(bg)
            .child(minus)
            .child(
                div().h(px(28.)).w(px(40.)).child(
                    Input::new(&self.input)
                        .appearance(false)
                        .bordered(false)
                        .focus_bordered(false)
                        .w_full()
                        .h(px(28.))
                        .text_center()
                        .text_size(px(12.)),
                ),
            )
            .child(plus)
    }
}

/// A square color chip; `None` leaves it empty.
pub fn swatch(color: Option<Hsla>, border: Hsla) -> impl IntoElement {
    div()
        .size(px(14.))
        .rounded(px(3.))
        .border_1()
        .border_color(border)
        .when_some(color, |this, color| this.bg(color))
}

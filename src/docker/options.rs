use egui::Vec2;

/// Options for [`super::Docker`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DockerOptions {
    /// Directory theme files are loaded from. Stored for the host; nothing is loaded here.
    pub theme_path: String,

    /// Active theme name, without a `.css` suffix.
    pub theme: String,

    /// Whether the host should offer the layout context menu.
    pub allow_context_menu: bool,

    /// Report panel content as hidden while the container is being resized (see
    /// [`super::Docker::is_content_hidden`]).
    pub hide_on_resize: bool,

    /// Enables the left/right/bottom collapser drawers.
    pub allow_collapse: bool,

    /// Coalescing interval for deferred layout recomputation, in milliseconds.
    pub response_rate_ms: u64,

    /// Quiet period after the last container resize before `ResizeEnded` fires.
    pub resize_debounce_ms: u64,

    /// Thickness of a frame's tab strip.
    pub title_bar_height: f32,

    /// Width of one tab in the tab strip.
    pub tab_width: f32,

    /// Thickness of the draggable bar between splitter panes.
    pub splitter_bar_size: f32,

    /// Thickness of a collapser's edge bar while its drawer is closed.
    pub collapser_bar_size: f32,

    /// Grab distance for floating frame edge/corner resizing.
    pub resize_handle_size: f32,

    /// Floating frames never get smaller than this.
    pub min_frame_size: Vec2,

    /// Size of a new floating frame when neither options nor the panel say otherwise.
    pub default_float_size: Vec2,

    /// Size of a collapser drawer when nothing better is known.
    pub default_drawer_size: Vec2,

    /// Fraction of the split container a new pane gets when no size is requested.
    pub default_split_fraction: f32,

    /// Offset applied to a frame created by floating a single panel, so it does not
    /// sit exactly on top of where it was.
    pub float_cascade_offset: f32,

    pub anchor: AnchorTuning,

    /// Run the tree integrity checker after every structural operation and log issues.
    pub debug_integrity: bool,

    /// Panic instead of logging when `debug_integrity` finds a problem.
    pub debug_integrity_panic: bool,
}

impl Default for DockerOptions {
    fn default() -> Self {
        Self {
            theme_path: "Themes".to_owned(),
            theme: "default".to_owned(),
            allow_context_menu: true,
            hide_on_resize: false,
            allow_collapse: true,
            response_rate_ms: 10,
            resize_debounce_ms: 150,
            title_bar_height: 24.0,
            tab_width: 100.0,
            splitter_bar_size: 4.0,
            collapser_bar_size: 24.0,
            resize_handle_size: 6.0,
            min_frame_size: Vec2::new(50.0, 50.0),
            default_float_size: Vec2::new(400.0, 300.0),
            default_drawer_size: Vec2::new(250.0, 200.0),
            default_split_fraction: 0.5,
            float_cascade_offset: 20.0,
            anchor: AnchorTuning::default(),
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl DockerOptions {
    /// Set the theme by name; a trailing `.css` is ignored.
    pub fn set_theme(&mut self, name: &str) {
        self.theme = name.strip_suffix(".css").unwrap_or(name).to_owned();
    }

    pub fn is_collapse_enabled(&self) -> bool {
        self.allow_collapse
    }
}

/// Shape of the drop zones carved out of each frame during a drag.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnchorTuning {
    /// Depth of the top/left/right/bottom bands, as a fraction of the frame.
    pub edge_band_fraction: f32,

    /// Depth of the preview shown for an edge drop, as a fraction of the frame.
    pub preview_fraction: f32,

    /// Whether the middle of a frame (outside every band) stacks as a tab.
    pub center_stacks: bool,
}

impl Default for AnchorTuning {
    fn default() -> Self {
        Self {
            edge_band_fraction: 0.25,
            preview_fraction: 0.5,
            center_stacks: true,
        }
    }
}

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub positive: Color,
    pub negative: Color,
    pub accent: Color,
    pub input_accent: Color,
    pub title: Color,
    pub error: Color,
    /// Line colors for chart series, cycled by series index.
    pub series: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        dark()
    }
}

impl Theme {
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }
}

pub fn by_name(name: &str) -> Theme {
    match name {
        "dark" => dark(),
        "dark-blue" => dark_blue(),
        "solarized-dark" => solarized_dark(),
        "light" => light(),
        "no-color" => no_color(),
        _ => dark(),
    }
}

pub const THEME_NAMES: &[&str] = &["dark", "dark-blue", "solarized-dark", "light", "no-color"];

// -- Themes --

pub fn dark() -> Theme {
    Theme {
        fg: Color::Indexed(253),
        bg: Color::Reset,
        dim: Color::Indexed(243),
        border: Color::Indexed(240),
        highlight_bg: Color::Indexed(237),
        highlight_fg: Color::Indexed(255),
        positive: Color::Indexed(46),
        negative: Color::Indexed(196),
        accent: Color::Indexed(81),
        input_accent: Color::Indexed(220),
        title: Color::Indexed(255),
        error: Color::Indexed(196),
        // cyan, gold, pink, green, orange, violet
        series: [
            Color::Indexed(81),
            Color::Indexed(220),
            Color::Indexed(205),
            Color::Indexed(120),
            Color::Indexed(208),
            Color::Indexed(141),
        ],
    }
}

pub fn dark_blue() -> Theme {
    Theme {
        fg: Color::Indexed(153),
        bg: Color::Reset,
        dim: Color::Indexed(60),
        border: Color::Indexed(24),
        highlight_bg: Color::Indexed(17),
        highlight_fg: Color::Indexed(231),
        positive: Color::Indexed(49),
        negative: Color::Indexed(203),
        accent: Color::Indexed(39),
        input_accent: Color::Indexed(117),
        title: Color::Indexed(75),
        error: Color::Indexed(203),
        series: [
            Color::Indexed(39),
            Color::Indexed(117),
            Color::Indexed(49),
            Color::Indexed(183),
            Color::Indexed(222),
            Color::Indexed(203),
        ],
    }
}

pub fn solarized_dark() -> Theme {
    // base01=#586e75 base0=#839496 yellow=#b58900 orange=#cb4b16 red=#dc322f
    // green=#859900 cyan=#2aa198 blue=#268bd2 violet=#6c71c4 magenta=#d33682
    Theme {
        fg: Color::Indexed(246),
        bg: Color::Reset,
        dim: Color::Indexed(240),
        border: Color::Indexed(23),
        highlight_bg: Color::Indexed(23),
        highlight_fg: Color::Indexed(230),
        positive: Color::Indexed(64),
        negative: Color::Indexed(160),
        accent: Color::Indexed(37),
        input_accent: Color::Indexed(136),
        title: Color::Indexed(33),
        error: Color::Indexed(166),
        series: [
            Color::Indexed(33),
            Color::Indexed(136),
            Color::Indexed(37),
            Color::Indexed(125),
            Color::Indexed(64),
            Color::Indexed(61),
        ],
    }
}

pub fn light() -> Theme {
    Theme {
        fg: Color::Indexed(234),
        bg: Color::Indexed(231),
        dim: Color::Indexed(246),
        border: Color::Indexed(251),
        highlight_bg: Color::Indexed(253),
        highlight_fg: Color::Indexed(232),
        positive: Color::Indexed(28),
        negative: Color::Indexed(124),
        accent: Color::Indexed(25),
        input_accent: Color::Indexed(130),
        title: Color::Indexed(232),
        error: Color::Indexed(124),
        series: [
            Color::Indexed(25),
            Color::Indexed(130),
            Color::Indexed(28),
            Color::Indexed(90),
            Color::Indexed(124),
            Color::Indexed(30),
        ],
    }
}

pub fn no_color() -> Theme {
    Theme {
        fg: Color::Reset,
        bg: Color::Reset,
        dim: Color::Reset,
        border: Color::Reset,
        highlight_bg: Color::Reset,
        highlight_fg: Color::Reset,
        positive: Color::Reset,
        negative: Color::Reset,
        accent: Color::Reset,
        input_accent: Color::Reset,
        title: Color::Reset,
        error: Color::Reset,
        series: [Color::Reset; 6],
    }
}

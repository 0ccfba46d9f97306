use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use tracing::{debug, info};

use crate::api::MarketData;
use crate::chart::{self, ChartRow};
use crate::config::Config;
use crate::fetch::{FetchResult, Fetcher};
use crate::store::Stores;
use crate::theme::{self, Theme};
use crate::types::*;
use crate::ui::select::{SelectList, SelectProps};

pub struct App {
    pub tab: Tab,
    pub stores: Stores,
    /// Picked coin ids in the order they were picked.
    pub selection: Vec<String>,
    pub selector: SelectList,
    /// Highlighted row of the price table.
    pub selected: usize,
    pub chart_view: ChartView,
    pub chart_scale: ChartScale,
    pub last_refresh: Option<Instant>,
    pub last_refresh_display: String,
    pub config: Config,
    pub theme: Theme,
    pub quit: bool,
}

/// Builds the picker inputs from disjoint parts of the app so the picker
/// itself can stay mutably borrowed.
pub fn select_props<'a>(
    stores: &'a Stores,
    selection: &'a [String],
    config: &'a Config,
) -> SelectProps<'a> {
    SelectProps {
        options: &stores.coins.data,
        selected: selection,
        is_loading: stores.coins.loading,
        error: stores.coins.error.as_deref(),
        placeholder: &config.placeholder,
        height: config.list_height,
        item_height: config.item_height,
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = theme::by_name(&config.theme);
        Self {
            tab: Tab::Prices,
            stores: Stores::default(),
            selection: Vec::new(),
            selector: SelectList::new(),
            selected: 0,
            chart_view: ChartView::from_days(config.chart_days),
            chart_scale: ChartScale::Price,
            last_refresh: None,
            last_refresh_display: String::new(),
            config,
            theme,
            quit: false,
        }
    }

    pub fn start<C: MarketData>(&mut self, fetcher: &Fetcher<C>) {
        info!("dashboard started");
        fetcher.ensure_coin_list(&mut self.stores);
    }

    pub fn apply(&mut self, result: FetchResult) {
        if let FetchResult::Charts { days, .. } = result {
            if days != self.chart_view.days() {
                debug!(days, "dropping chart batch for previous range");
                return;
            }
        }
        let coins_loaded = matches!(result, FetchResult::CoinList(Ok(_)));
        if matches!(result, FetchResult::Prices(Ok(_))) {
            self.last_refresh = Some(Instant::now());
        }
        self.stores.apply(result);
        if coins_loaded {
            self.selector.refilter(&self.stores.coins.data);
        }
    }

    pub fn set_selection<C: MarketData>(&mut self, next: Vec<String>, fetcher: &Fetcher<C>) {
        info!(count = next.len(), "selection changed");
        self.selection = next;
        self.clamp_selected();

        fetcher.load_prices(&mut self.stores, &self.selection);
        let missing: Vec<String> = self
            .selection
            .iter()
            .filter(|id| self.stores.charts.series(id).is_none())
            .cloned()
            .collect();
        fetcher.load_charts(&mut self.stores, &missing, self.chart_view.days());
    }

    pub fn refresh<C: MarketData>(&mut self, fetcher: &Fetcher<C>) {
        debug!("manual refresh");
        fetcher.load_prices(&mut self.stores, &self.selection);
        fetcher.load_charts(&mut self.stores, &self.selection, self.chart_view.days());
    }

    pub fn set_chart_view<C: MarketData>(&mut self, view: ChartView, fetcher: &Fetcher<C>) {
        if view == self.chart_view {
            return;
        }
        self.chart_view = view;
        self.stores.charts.data.clear();
        fetcher.load_charts(&mut self.stores, &self.selection, view.days());
    }

    /// Called once per loop iteration.
    pub fn on_tick<C: MarketData>(&mut self, fetcher: &Fetcher<C>) {
        self.selector.tick();
        self.update_refresh_display();

        let due = self
            .last_refresh
            .is_some_and(|t| t.elapsed() >= Duration::from_secs(self.config.refresh_interval_secs));
        if due && !self.selection.is_empty() && !self.stores.prices.loading {
            debug!("auto refresh prices");
            fetcher.load_prices(&mut self.stores, &self.selection);
        }
    }

    pub fn update_refresh_display(&mut self) {
        if let Some(inst) = self.last_refresh {
            let secs = inst.elapsed().as_secs();
            if secs < 60 {
                self.last_refresh_display = format!("{}s ago", secs);
            } else {
                self.last_refresh_display = format!("{}m ago", secs / 60);
            }
        }
    }

    pub fn handle_key<C: MarketData>(&mut self, key: KeyEvent, fetcher: &Fetcher<C>) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        if self.selector.is_open() {
            let props = select_props(&self.stores, &self.selection, &self.config);
            if let Some(next) = self.selector.handle_key(key, &props) {
                self.set_selection(next, fetcher);
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Prices,
            KeyCode::Char('2') => self.tab = Tab::Charts,
            KeyCode::Char('o') | KeyCode::Char('/') | KeyCode::Enter => {
                let props = select_props(&self.stores, &self.selection, &self.config);
                if !self.selector.open(&props) {
                    debug!("picker disabled");
                }
            }
            KeyCode::Char('r') => self.refresh(fetcher),
            KeyCode::Char('l') | KeyCode::Right => {
                self.set_chart_view(self.chart_view.next(), fetcher)
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.set_chart_view(self.chart_view.prev(), fetcher)
            }
            KeyCode::Char('p') => self.chart_scale = self.chart_scale.toggle(),
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.selection.is_empty() {
                    self.selected = (self.selected + 1).min(self.selection.len() - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('x') | KeyCode::Char('d') => {
                if let Some(id) = self.selection.get(self.selected).cloned() {
                    info!(coin = %id, "removed from table");
                    let next = crate::ui::select::toggle(&self.selection, &id);
                    self.set_selection(next, fetcher);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse<C: MarketData>(&mut self, ev: MouseEvent, fetcher: &Fetcher<C>) {
        let props = select_props(&self.stores, &self.selection, &self.config);
        if let Some(next) = self.selector.handle_mouse(ev, &props) {
            self.set_selection(next, fetcher);
        }
    }

    fn clamp_selected(&mut self) {
        if self.selection.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.selection.len() {
            self.selected = self.selection.len() - 1;
        }
    }

    pub fn coin(&self, id: &str) -> Option<&Candidate> {
        self.stores.coins.find(id)
    }

    /// Display label for a selected id: ticker, else name, else the id.
    pub fn coin_label(&self, id: &str) -> String {
        match self.coin(id) {
            Some(c) if c.symbol.is_some() => c.ticker(),
            Some(c) if !c.name.is_empty() => c.name.clone(),
            _ => id.to_string(),
        }
    }

    /// Rows for the chart page over the selected coins that have a series,
    /// in selection order, plus the ids that made it in.
    pub fn chart_rows(&self) -> (Vec<String>, Vec<ChartRow>) {
        let series: Vec<(&str, &[SeriesPoint])> = self
            .selection
            .iter()
            .filter_map(|id| {
                self.stores
                    .charts
                    .series(id)
                    .map(|s| (id.as_str(), s.as_slice()))
            })
            .collect();
        let ids = series.iter().map(|(id, _)| id.to_string()).collect();
        let rows = chart::reshape(&series);
        let rows = match self.chart_scale {
            ChartScale::Price => rows,
            ChartScale::Percent => chart::normalize(&rows),
        };
        (ids, rows)
    }
}

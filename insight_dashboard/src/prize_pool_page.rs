// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tournament prize pools by genre.
//!
//! The viewership, general esports and historical earnings datasets are joined on game
//! before anything else, so every chart on the page sees the same games.

use std::collections::HashMap;
use std::sync::Arc;

use insight_charts::{
    BarChart, BarDatum, BarGroup, CategoryColors, ChartRenderer, DualAxisLineChart, GroupedBar,
    GroupedBarChart, RenderError, YearPair, format_currency, format_grouped,
};
use insight_transforms::{JoinKeys, Reducer, group_reduce, top_n_by};
use log::debug;

use crate::filter::TopNControl;
use crate::page::{ChartSettings, ChartSnapshot};
use crate::records::{GeneralEsportsRow, HistoricalEarningsRow, ViewershipRow};

/// Series name of average hours watched.
pub const HOURS_WATCHED: &str = "Avg. Hours Watched";
/// Series name of average total earnings.
pub const TOTAL_EARNINGS: &str = "Avg. Total Earnings";
/// Genre of games missing from the general esports data.
pub const UNKNOWN_GENRE: &str = "Unknown";
/// Number of bars in the top games chart.
pub const TOP_GAMES: usize = 10;

/// Everything the prize pool charts draw, derived in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrizePoolView {
    /// Genres with the largest mean total earnings, largest first.
    pub top_genres: Arc<[String]>,
    /// Every genre of the joined data, sorted; colors are assigned over this set.
    pub genres: Vec<String>,
    /// Average prize pool per tournament for each top genre, largest first.
    pub avg_prize_pool: Vec<BarDatum>,
    /// Games with the largest historical earnings within the top genres.
    pub top_games: Vec<BarDatum>,
    /// Mean hours watched and mean earnings per year.
    pub viewership_vs_earnings: Vec<YearPair>,
    /// Mean hours watched and mean earnings per top genre, sorted by genre.
    pub monetization: Vec<BarGroup>,
}

#[derive(Clone, Debug)]
struct Enriched {
    year: i32,
    genre: String,
    hours_watched: f64,
    earnings: f64,
}

impl PrizePoolView {
    /// Derives the view for the `n` top genres.
    pub fn derive(
        viewership: &[ViewershipRow],
        general: &[GeneralEsportsRow],
        historical: &[HistoricalEarningsRow],
        n: usize,
    ) -> Self {
        let games = JoinKeys::<String>::new()
            .with(viewership, |r| r.game.as_str())
            .with(general, |r| r.game.as_str())
            .with(historical, |r| r.game.as_str());
        let viewership = games.retain(viewership, |r| r.game.as_str());
        let general = games.retain(general, |r| r.game.as_str());
        let historical = games.retain(historical, |r| r.game.as_str());

        let top_genres: Arc<[String]> = top_n_by(
            &general,
            |r| r.genre.clone(),
            Reducer::Mean(&|r: &GeneralEsportsRow| r.total_earnings),
            n,
        )
        .into();
        let is_top = |genre: &str| top_genres.iter().any(|g| g == genre);

        let mut genres: Vec<String> = general.iter().map(|r| r.genre.clone()).collect();
        genres.sort();
        genres.dedup();

        let genre_of: HashMap<&str, &str> = general.iter().fold(HashMap::new(), |mut map, r| {
            map.entry(r.game.as_str()).or_insert(r.genre.as_str());
            map
        });

        let top_general: Vec<GeneralEsportsRow> =
            general.iter().filter(|r| is_top(r.genre.as_str())).cloned().collect();
        let mut pools = group_reduce(
            &top_general,
            |r| r.genre.clone(),
            &[
                Reducer::RatioOfSums(
                    &|r: &GeneralEsportsRow| r.total_earnings,
                    &|r: &GeneralEsportsRow| r.total_tournaments,
                ),
                Reducer::Sum(&|r: &GeneralEsportsRow| r.total_tournaments),
            ],
        );
        pools.sort_by(|a, b| b.value(0).total_cmp(&a.value(0)));
        let avg_prize_pool = pools
            .into_iter()
            .map(|row| {
                let (pool, tournaments) = (row.value(0), row.value(1));
                BarDatum::new(row.key, pool)
                    .with_detail(format!("Avg Prize Pool: {}", format_currency(pool)))
                    .with_detail(format!("Total Tournaments: {}", format_grouped(tournaments)))
            })
            .collect();

        let mut game_earnings = group_reduce(
            &historical,
            |r| r.game.clone(),
            &[Reducer::Sum(&|r: &HistoricalEarningsRow| r.earnings)],
        );
        game_earnings.sort_by(|a, b| b.value(0).total_cmp(&a.value(0)));
        let top_games = game_earnings
            .into_iter()
            .filter_map(|row| {
                let genre = genre_of.get(row.key.as_str()).copied().unwrap_or(UNKNOWN_GENRE);
                is_top(genre).then(|| {
                    let total = row.value(0);
                    BarDatum::new(row.key.clone(), total)
                        .with_color_key(genre)
                        .with_detail(format!("Genre: {genre}"))
                        .with_detail(format!("Total Earnings: {}", format_currency(total)))
                })
            })
            .take(TOP_GAMES)
            .collect();

        let enriched: Vec<Enriched> = viewership
            .iter()
            .filter_map(|r| {
                let matched = general.iter().find(|g| g.game == r.game);
                let genre = matched.map_or(UNKNOWN_GENRE, |g| g.genre.as_str());
                is_top(genre).then(|| Enriched {
                    year: r.year,
                    genre: genre.to_owned(),
                    hours_watched: r.hours_watched,
                    earnings: matched.map_or(0.0, |g| g.total_earnings),
                })
            })
            .collect();
        let hours_watched = |e: &Enriched| e.hours_watched;
        let earnings = |e: &Enriched| e.earnings;
        let means: [Reducer<'_, Enriched>; 2] =
            [Reducer::Mean(&hours_watched), Reducer::Mean(&earnings)];

        let mut viewership_vs_earnings: Vec<YearPair> = group_reduce(&enriched, |e| e.year, &means)
            .into_iter()
            .map(|row| YearPair {
                year: row.key,
                left: row.value(0),
                right: row.value(1),
            })
            .collect();
        viewership_vs_earnings.sort_by_key(|p| p.year);

        let mut monetization: Vec<BarGroup> = group_reduce(&enriched, |e| e.genre.clone(), &means)
            .into_iter()
            .map(|row| {
                let (watched, earned) = (row.value(0), row.value(1));
                BarGroup {
                    key: row.key,
                    bars: vec![
                        GroupedBar {
                            series: HOURS_WATCHED.to_owned(),
                            value: watched,
                            details: vec![format!("{HOURS_WATCHED}: {}", format_grouped(watched))],
                        },
                        GroupedBar {
                            series: TOTAL_EARNINGS.to_owned(),
                            value: earned,
                            details: vec![format!("{TOTAL_EARNINGS}: {}", format_currency(earned))],
                        },
                    ],
                }
            })
            .collect();
        monetization.sort_by(|a, b| a.key.cmp(&b.key));

        Self {
            top_genres,
            genres,
            avg_prize_pool,
            top_games,
            viewership_vs_earnings,
            monetization,
        }
    }
}

/// The prize pool page: one genre control feeding four charts.
#[derive(Debug)]
pub struct PrizePoolPage {
    genres: TopNControl,
    viewership: Arc<[ViewershipRow]>,
    general: Arc<[GeneralEsportsRow]>,
    historical: Arc<[HistoricalEarningsRow]>,
    view: Arc<PrizePoolView>,
    avg_prize_pool: ChartRenderer<BarChart>,
    top_games: ChartRenderer<BarChart>,
    viewership_vs_earnings: ChartRenderer<DualAxisLineChart>,
    monetization: ChartRenderer<GroupedBarChart>,
}

impl PrizePoolPage {
    /// Creates an empty page.
    pub fn new(genres: TopNControl, settings: ChartSettings) -> Self {
        let colors = || CategoryColors::genres(core::iter::empty::<&str>());
        Self {
            genres,
            viewership: Arc::from([]),
            general: Arc::from([]),
            historical: Arc::from([]),
            view: Arc::new(PrizePoolView::default()),
            avg_prize_pool: settings.renderer(BarChart::new(colors(), "Avg Prize Pool (USD)")),
            top_games: settings.renderer(BarChart::new(colors(), "Total Earnings (USD)")),
            viewership_vs_earnings: settings.renderer(DualAxisLineChart::new()),
            monetization: settings.renderer(GroupedBarChart::new([HOURS_WATCHED, TOTAL_EARNINGS])),
        }
    }

    /// The genre control.
    pub fn genres(&self) -> TopNControl {
        self.genres
    }

    /// Current derived view.
    pub fn view(&self) -> &Arc<PrizePoolView> {
        &self.view
    }

    /// Replaces the rows and recomputes the view.
    pub fn set_data(
        &mut self,
        viewership: Arc<[ViewershipRow]>,
        general: Arc<[GeneralEsportsRow]>,
        historical: Arc<[HistoricalEarningsRow]>,
    ) {
        self.viewership = viewership;
        self.general = general;
        self.historical = historical;
        self.recompute();
    }

    /// Sets the genre count. Returns `true` if the view was recomputed.
    pub fn set_top_n(&mut self, n: usize) -> bool {
        let changed = self.genres.set(n);
        if changed {
            self.recompute();
        }
        changed
    }

    /// Handles a raw selector value.
    pub fn on_top_n_change(&mut self, raw: i64) -> bool {
        let changed = self.genres.on_change(raw);
        if changed {
            self.recompute();
        }
        changed
    }

    fn recompute(&mut self) {
        let view = PrizePoolView::derive(
            &self.viewership,
            &self.general,
            &self.historical,
            self.genres.value(),
        );
        debug!(
            "prize pool view: {} genres, top {}",
            view.genres.len(),
            view.top_genres.len()
        );
        let colors = CategoryColors::genres(&view.genres);
        self.top_games.chart_mut().colors = colors.clone();
        self.avg_prize_pool.chart_mut().colors = colors;
        self.view = Arc::new(view);
    }

    /// Renders every chart from the current view at time `now`.
    pub fn render(&mut self, now: f64) -> Result<(), RenderError> {
        let view = Arc::clone(&self.view);
        self.avg_prize_pool.render(&view.avg_prize_pool, now)?;
        self.top_games.render(&view.top_games, now)?;
        self.viewership_vs_earnings
            .render(&view.viewership_vs_earnings, now)?;
        self.monetization.render(&view.monetization, now)?;
        Ok(())
    }

    /// Average prize pool chart.
    pub fn avg_prize_pool(&self) -> &ChartRenderer<BarChart> {
        &self.avg_prize_pool
    }

    /// Mutable average prize pool chart, for pointer events and resizing.
    pub fn avg_prize_pool_mut(&mut self) -> &mut ChartRenderer<BarChart> {
        &mut self.avg_prize_pool
    }

    /// Top games chart.
    pub fn top_games(&self) -> &ChartRenderer<BarChart> {
        &self.top_games
    }

    /// Mutable top games chart.
    pub fn top_games_mut(&mut self) -> &mut ChartRenderer<BarChart> {
        &mut self.top_games
    }

    /// Viewership versus earnings chart.
    pub fn viewership_vs_earnings(&self) -> &ChartRenderer<DualAxisLineChart> {
        &self.viewership_vs_earnings
    }

    /// Mutable viewership versus earnings chart.
    pub fn viewership_vs_earnings_mut(&mut self) -> &mut ChartRenderer<DualAxisLineChart> {
        &mut self.viewership_vs_earnings
    }

    /// Genre monetization chart.
    pub fn monetization(&self) -> &ChartRenderer<GroupedBarChart> {
        &self.monetization
    }

    /// Mutable genre monetization chart.
    pub fn monetization_mut(&mut self) -> &mut ChartRenderer<GroupedBarChart> {
        &mut self.monetization
    }

    /// Snapshots of every chart at time `now`.
    pub fn snapshots(&self, now: f64) -> Vec<ChartSnapshot> {
        vec![
            ChartSnapshot::capture("avg_prize_pool", &self.avg_prize_pool, now),
            ChartSnapshot::capture("top_games_by_earnings", &self.top_games, now),
            ChartSnapshot::capture("viewership_vs_earnings", &self.viewership_vs_earnings, now),
            ChartSnapshot::capture("genre_monetization", &self.monetization, now),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(game: &str, genre: &str, earnings: f64, tournaments: f64) -> GeneralEsportsRow {
        GeneralEsportsRow {
            game: game.to_owned(),
            genre: genre.to_owned(),
            total_earnings: earnings,
            total_tournaments: tournaments,
        }
    }

    fn viewing(year: i32, game: &str, watched: f64) -> ViewershipRow {
        ViewershipRow {
            year,
            game: game.to_owned(),
            peak_viewers: 0.0,
            hours_streamed: 0.0,
            hours_watched: watched,
            avg_viewers: 0.0,
        }
    }

    fn earned(year: i32, game: &str, earnings: f64) -> HistoricalEarningsRow {
        HistoricalEarningsRow {
            year,
            game: game.to_owned(),
            earnings,
        }
    }

    struct Sample {
        viewership: Vec<ViewershipRow>,
        general: Vec<GeneralEsportsRow>,
        historical: Vec<HistoricalEarningsRow>,
    }

    fn sample() -> Sample {
        Sample {
            viewership: vec![
                viewing(2020, "Dota 2", 100.0),
                viewing(2021, "Dota 2", 300.0),
                viewing(2020, "Smite", 50.0),
                viewing(2020, "Valorant", 80.0),
                viewing(2020, "Not In General", 1e9),
            ],
            general: vec![
                general("Dota 2", "MOBA", 1000.0, 2.0),
                general("Smite", "MOBA", 500.0, 1.0),
                general("Valorant", "Shooter", 400.0, 4.0),
                general("No Viewers", "Racing", 1e9, 1.0),
            ],
            historical: vec![
                earned(2020, "Dota 2", 700.0),
                earned(2021, "Dota 2", 300.0),
                earned(2020, "Smite", 500.0),
                earned(2020, "Valorant", 400.0),
            ],
        }
    }

    fn derive(s: &Sample, n: usize) -> PrizePoolView {
        PrizePoolView::derive(&s.viewership, &s.general, &s.historical, n)
    }

    #[test]
    fn games_missing_from_any_dataset_are_dropped() {
        let view = derive(&sample(), 5);
        assert_eq!(view.genres, ["MOBA", "Shooter"], "Racing has no viewership");
        assert!(view.top_games.iter().all(|d| d.key != "Not In General"));
    }

    #[test]
    fn prize_pool_is_pooled_over_tournaments() {
        let view = derive(&sample(), 5);
        let moba = view
            .avg_prize_pool
            .iter()
            .find(|d| d.key == "MOBA")
            .expect("MOBA bar");
        assert_eq!(moba.value, 500.0, "(1000 + 500) / (2 + 1)");
        assert_eq!(moba.details[0], "Avg Prize Pool: $500");
        assert_eq!(moba.details[1], "Total Tournaments: 3");
        assert_eq!(view.avg_prize_pool[0].key, "MOBA", "largest first");
    }

    #[test]
    fn genres_rank_by_mean_earnings() {
        let view = derive(&sample(), 1);
        assert_eq!(&*view.top_genres, ["MOBA"], "mean 750 beats 400");
        assert_eq!(view.avg_prize_pool.len(), 1);
        let games: Vec<&str> = view.top_games.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(games, ["Dota 2", "Smite"]);
        assert_eq!(view.top_games[0].value, 1000.0);
        assert_eq!(view.top_games[0].color_key, "MOBA");
        assert!(view.monetization.iter().all(|g| g.key == "MOBA"));
    }

    #[test]
    fn yearly_means_follow_the_selected_genres() {
        let view = derive(&sample(), 1);
        assert_eq!(
            view.viewership_vs_earnings,
            [
                YearPair {
                    year: 2020,
                    left: 75.0,
                    right: 750.0,
                },
                YearPair {
                    year: 2021,
                    left: 300.0,
                    right: 1000.0,
                },
            ]
        );
    }

    #[test]
    fn monetization_groups_are_sorted_by_genre() {
        let view = derive(&sample(), 5);
        let keys: Vec<&str> = view.monetization.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["MOBA", "Shooter"]);
        let shooter = &view.monetization[1];
        assert_eq!(shooter.bars[0].series, HOURS_WATCHED);
        assert_eq!(shooter.bars[1].details[0], "Avg. Total Earnings: $400");
    }

    #[test]
    fn empty_inputs_give_an_empty_view() {
        let s = sample();
        let view = PrizePoolView::derive(&s.viewership, &[], &s.historical, 5);
        assert_eq!(view, PrizePoolView::default());
    }

    #[test]
    fn the_page_recomputes_only_on_change() {
        let s = sample();
        let mut page = PrizePoolPage::new(TopNControl::genres(), ChartSettings::default());
        page.set_data(s.viewership.into(), s.general.into(), s.historical.into());
        page.render(0.0).expect("render");
        let before = Arc::clone(page.view());
        assert!(!page.set_top_n(5));
        assert!(Arc::ptr_eq(&before, page.view()), "no recomputation");
        assert!(page.on_top_n_change(3));
        assert_eq!(page.genres().value(), 3);
        page.render(100.0).expect("render");
        assert_eq!(page.snapshots(1_000.0).len(), 4);
    }
}

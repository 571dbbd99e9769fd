use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{RaceCardDocument, RaceCardHeader, RaceEntryRow};
use crate::utils::capitalize_words;

static RE_NO_RACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)No\s+Races|No races scheduled|No Race Card")
        .expect("invalid regex: no races")
});

static RE_HEADLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Race Card\s*-\s*(.+?)\s*-\s*(\d{2}\s\w+\s\d{4})")
        .expect("invalid regex: headline")
});

static RE_DRAW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("invalid regex: draw"));

static RE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("invalid regex: digits"));

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn select_text(document: &Html, selector: &Selector) -> String {
    document.select(selector).next().map(elem_text).unwrap_or_default()
}

fn parse_header(document: &Html, fallback_date: &str) -> RaceCardHeader {
    let headline_sel = Selector::parse(".home.headline_home h3.border_bottom")
        .expect("invalid selector: headline");
    document
        .select(&headline_sel)
        .next()
        .and_then(|element| {
            let text = elem_text(element);
            RE_HEADLINE.captures(&text).map(|caps| RaceCardHeader {
                location: caps[1].trim().to_string(),
                date: caps[2].trim().to_string(),
            })
        })
        .unwrap_or_else(|| RaceCardHeader::fallback(fallback_date))
}

/// Extract a full racecard from a fetched page.
///
/// Returns `None` when the page signals "no races" or contains no race
/// blocks at all. Both are normal empty outcomes, not errors. Individual
/// fields that cannot be located resolve to empty strings rather than
/// failing the page.
pub fn extract_racecard(html: &str, fallback_date: &str) -> Option<RaceCardDocument> {
    if RE_NO_RACES.is_match(html) {
        log::info!("Page indicates no races scheduled");
        return None;
    }

    let document = Html::parse_document(html);
    let header = parse_header(&document, fallback_date);

    let block_sel = Selector::parse(".race-card-new").expect("invalid selector: race block");
    let blocks: Vec<ElementRef> = document.select(&block_sel).collect();
    if blocks.is_empty() {
        log::info!("No race blocks found on page");
        return None;
    }

    let country_sel = Selector::parse(".race-country").expect("invalid selector: country");
    let ground_sel = Selector::parse(".race-ground").expect("invalid selector: ground");
    let country = select_text(&document, &country_sel);
    let ground = select_text(&document, &ground_sel);

    let tr_sel = Selector::parse("tr").expect("invalid selector: row");
    let td_sel = Selector::parse("td").expect("invalid selector: cell");
    let name_sel = Selector::parse("h5 a").expect("invalid selector: horse name");

    let mut races = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let race_no = i + 1;
        // The time heading lives outside the block, keyed by race position.
        let time_sel = Selector::parse(&format!("#race-{} h4:nth-child(2)", race_no))
            .expect("invalid selector: race time");
        let time = select_text(&document, &time_sel);

        let mut rows: Vec<RaceEntryRow> = Vec::new();
        for tr in block.select(&tr_sel) {
            let cells: Vec<ElementRef> = tr.select(&td_sel).collect();
            if cells.len() < 3 {
                // header or filler row
                continue;
            }

            let number_text = elem_text(cells[0]);
            let horse_number = RE_DRAW.replace_all(&number_text, "").trim().to_string();
            let draw = RE_DRAW
                .captures(&number_text)
                .map(|caps| caps[1].to_string())
                .unwrap_or_default();

            let horse_name = cells[2]
                .select(&name_sel)
                .next()
                .map(elem_text)
                .unwrap_or_else(|| elem_text(cells[2]));
            let horse_name = capitalize_words(&horse_name);

            let age = cells
                .get(3)
                .map(|cell| elem_text(*cell))
                .and_then(|text| RE_DIGITS.find(&text).map(|m| m.as_str().to_string()))
                .unwrap_or_default();
            let trainer = cells.get(5).map(|cell| elem_text(*cell)).unwrap_or_default();
            let jockey = cells.get(6).map(|cell| elem_text(*cell)).unwrap_or_default();

            rows.push(RaceEntryRow {
                race: race_no,
                country: country.clone(),
                ground: ground.clone(),
                time: if rows.is_empty() { time.clone() } else { String::new() },
                horse_number,
                horse_name,
                jockey,
                trainer,
                age,
                draw,
            });
        }
        races.push(rows);
    }

    Some(RaceCardDocument { header, races })
}

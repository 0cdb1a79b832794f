//! Country record to view-tree fragments and prose.

use crate::api::Country;
use crate::view::tree::Fragment;

pub const NOT_AVAILABLE: &str = "not available";

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn join_or_na<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let joined = values.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

fn field(label: &str, value: String) -> Fragment {
    Fragment::new("span")
        .class("field")
        .attr("data-desc", label)
        .text(value)
}

/// Address of the detail screen for `country`.
pub fn details_address(country: &Country) -> String {
    format!("details?name={}", urlencoding::encode(country.id()))
}

/// Card shown for each country in a list. The star control is the last
/// child of the `actions` row.
pub fn country_card(country: &Country) -> Fragment {
    let title = format!("{} ( {} )", or_na(Some(country.id())), country.code());
    let continent = format!(
        "{} ( {} )",
        or_na(country.region.as_deref()),
        or_na(country.subregion.as_deref())
    );

    Fragment::new("article")
        .attr("data-name", country.id())
        .child(
            Fragment::new("img")
                .class("flag")
                .attr("src", or_na(country.flags.svg.as_deref()))
                .text(or_na(country.flags.alt.as_deref())),
        )
        .child(
            Fragment::new("div")
                .class("desc")
                .child(Fragment::new("h2").class("title").text(title))
                .child(
                    Fragment::new("span")
                        .class("official")
                        .text(or_na(Some(&country.name.official))),
                ),
        )
        .child(field(
            "language(s): ",
            join_or_na(country.languages.values().map(String::as_str)),
        ))
        .child(field("continent: ", continent))
        .child(field(
            "timezone(s): ",
            join_or_na(country.timezones.iter().flatten().map(String::as_str)),
        ))
        .child(field(
            "capital(s): ",
            join_or_na(country.capital.iter().flatten().map(String::as_str)),
        ))
        .child(
            Fragment::new("div")
                .class("actions")
                .child(
                    Fragment::new("a")
                        .class("link")
                        .attr("href", details_address(country))
                        .text("read more"),
                )
                .child(Fragment::new("span").class("star")),
        )
}

fn gini_phrase(country: &Country) -> String {
    let rankings: Vec<String> = country
        .gini
        .iter()
        .map(|(year, value)| format!("{} in {}", value, year))
        .collect();
    if rankings.is_empty() {
        "holds no FIFA rankings".to_string()
    } else {
        format!("held a FIFA ranking of {}", rankings.join(", "))
    }
}

fn currencies_phrase(country: &Country) -> String {
    let list: Vec<String> = country
        .currencies
        .values()
        .map(|c| {
            format!(
                "{} and denoted by the symbol( {} )",
                c.name,
                or_na(c.symbol.as_deref())
            )
        })
        .collect();
    join_or_na(list.iter().map(String::as_str))
}

/// Narrative paragraph for the detail screen.
pub fn description(country: &Country) -> String {
    let name = country.id();
    let native: Vec<&str> = country
        .name
        .native_name
        .values()
        .map(|n| n.official.as_str())
        .collect();
    let languages: Vec<&str> = country.languages.values().map(String::as_str).collect();

    format!(
        "{name}, identified by the country code {code}, is also referred to as the {official} \
         or, in its various native language(s): {native}. Situated within the region of \
         {subregion}, {name} is inhabited by approximately {population} individuals and \
         encompasses an expansive area measuring {area} square kilometers. The nation boasts \
         {language_count} official language(s), namely: {languages}. In the realm of sports, \
         {name} {gini} and follows a {side}-hand driving style. The official currency utilized \
         in {name} is the {currencies}. Employing the international dialing code {idd_root} \
         ( {idd_suffixes} ), the country's week kickstarts on a {week}. As an {independent} \
         entity, {name} also holds the distinction of being a {un} state within the United \
         Nations.",
        code = country.code(),
        official = or_na(Some(&country.name.official)),
        native = join_or_na(native),
        subregion = or_na(country.subregion.as_deref()),
        population = country.population,
        area = country.area,
        language_count = languages.len(),
        languages = join_or_na(languages),
        gini = gini_phrase(country),
        side = or_na(country.car.side.as_deref()),
        currencies = currencies_phrase(country),
        idd_root = or_na(country.idd.root.as_deref()),
        idd_suffixes = join_or_na(country.idd.suffixes.iter().map(String::as_str)),
        week = or_na(country.start_of_week.as_deref()),
        independent = if country.independent.unwrap_or(false) {
            "independent"
        } else {
            "non-independent"
        },
        un = if country.un_member { "member" } else { "non-member" },
    )
}

/// One list item per translation, reading "official, common".
pub fn translations(country: &Country) -> Vec<Fragment> {
    if country.translations.is_empty() {
        return vec![Fragment::new("li").class("translation").text(NOT_AVAILABLE)];
    }
    country
        .translations
        .iter()
        .map(|(lang, t)| {
            Fragment::new("li")
                .class("translation")
                .attr("lang", lang.as_str())
                .text(format!("{}, {}", t.official, t.common))
        })
        .collect()
}

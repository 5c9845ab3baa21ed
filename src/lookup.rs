use crate::Network;
use std::collections::HashSet;

/// City names containing `query`, ignoring case.
///
/// Cities keep the order of `networks`. A city served by several networks is listed once, with
/// the spelling of its first occurrence; spellings differing only in case count as one city.
pub fn cities_matching(networks: &[Network], query: &str) -> Vec<String> {
    let query = query.to_lowercase();
    let mut seen: HashSet<String> = HashSet::new();
    let mut cities: Vec<String> = vec![];
    for city in networks.iter().filter_map(Network::city) {
        let folded = city.to_lowercase();
        if !folded.contains(&query) {
            continue;
        }
        if seen.insert(folded) {
            cities.push(city.to_string());
        }
    }
    cities
}

/// Networks whose city equals `city`, ignoring case.
pub fn networks_in(networks: &[Network], city: &str) -> Vec<Network> {
    let city = city.to_lowercase();
    networks
        .iter()
        .filter(|network| match network.city() {
            Some(c) => c.to_lowercase() == city,
            None => false,
        })
        .cloned()
        .collect()
}

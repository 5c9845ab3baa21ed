use crate::Station;

/// Finds the station nearest to the given position, returning it with its distance in meters.
pub fn closest_station(
    stations: &[Station],
    latitude: f64,
    longitude: f64,
) -> Option<(Station, f64)> {
    let mut closest: Option<(&Station, f64)> = None;
    for station in stations {
        // NOTE: We are using flat earth approximation, as the distances are expected to be
        // small; a station in another city is of no use anyway.
        let distance = distance_meters(latitude, longitude, station.latitude, station.longitude);
        match &closest {
            Some((_, closest_distance)) => {
                if &distance < closest_distance {
                    closest = Some((station, distance));
                }
            }
            None => closest = Some((station, distance)),
        }
    }

    closest.map(|(station, distance)| (station.clone(), distance))
}

/// Formats a walking distance, e.g. `850 m` or `1.2 km`.
pub fn format_distance(meters: f64) -> Option<String> {
    if !meters.is_finite() || meters < 0.0 {
        return None;
    }

    let rounded = meters.round();
    if rounded < 1000.0 {
        return Some(format!("{:.0} m", rounded));
    }

    let km = (meters / 100.0).round() / 10.0;
    if km.fract() == 0.0 {
        Some(format!("{:.0} km", km))
    } else {
        Some(format!("{:.1} km", km))
    }
}

fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let x = (lon1 - lon2).to_radians() * f64::cos(((lat1 + lat2) / 2.0).to_radians());
    let y = (lat1 - lat2).to_radians();
    6371000.0 * f64::sqrt(x * x + y * y)
}

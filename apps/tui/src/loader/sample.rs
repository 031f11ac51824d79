use crate::domain::{Category, GeoPoint, Record};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const RANDOM_SIGHTINGS: usize = 470;
const SAMPLE_MIN_YEAR: i32 = -3000;
const SAMPLE_MAX_YEAR: i32 = 2023;
const CLUSTER_JITTER: f64 = 3.0;

struct City {
    name: &'static str,
    country: &'static str,
    region: &'static str,
    lat: f64,
    lng: f64,
}

const fn city(name: &'static str, country: &'static str, region: &'static str, lat: f64, lng: f64) -> City {
    City {
        name,
        country,
        region,
        lat,
        lng,
    }
}

const MAJOR_CITIES: [City; 29] = [
    city("New York", "USA", "East Coast", 40.7128, -74.0060),
    city("Los Angeles", "USA", "West Coast", 34.0522, -118.2437),
    city("Chicago", "USA", "Midwest", 41.8781, -87.6298),
    city("Houston", "USA", "South", 29.7604, -95.3698),
    city("Phoenix", "USA", "Southwest", 33.4484, -112.0740),
    city("Toronto", "Canada", "Ontario", 43.6532, -79.3832),
    city("Mexico City", "Mexico", "Mexico City", 19.4326, -99.1332),
    city("Rio de Janeiro", "Brazil", "Southeast", -22.9068, -43.1729),
    city("Buenos Aires", "Argentina", "Buenos Aires", -34.6037, -58.3816),
    city("Lima", "Peru", "Lima", -12.0464, -77.0428),
    city("London", "UK", "England", 51.5074, -0.1278),
    city("Paris", "France", "Île-de-France", 48.8566, 2.3522),
    city("Berlin", "Germany", "Berlin", 52.5200, 13.4050),
    city("Rome", "Italy", "Lazio", 41.9028, 12.4964),
    city("Madrid", "Spain", "Madrid", 40.4168, -3.7038),
    city("Moscow", "Russia", "Central", 55.7558, 37.6173),
    city("Tokyo", "Japan", "Kanto", 35.6762, 139.6503),
    city("Beijing", "China", "Beijing", 39.9042, 116.4074),
    city("Shanghai", "China", "Shanghai", 31.2304, 121.4737),
    city("Mumbai", "India", "Maharashtra", 19.0760, 72.8777),
    city("Delhi", "India", "Delhi", 28.7041, 77.1025),
    city("Seoul", "South Korea", "Seoul", 37.5665, 126.9780),
    city("Cairo", "Egypt", "Cairo Governorate", 30.0444, 31.2357),
    city("Lagos", "Nigeria", "Lagos", 6.5244, 3.3792),
    city("Johannesburg", "South Africa", "Gauteng", -26.2041, 28.0473),
    city("Nairobi", "Kenya", "Nairobi", -1.2921, 36.8219),
    city("Sydney", "Australia", "New South Wales", -33.8688, 151.2093),
    city("Melbourne", "Australia", "Victoria", -37.8136, 144.9631),
    city("Auckland", "New Zealand", "Auckland", -36.8509, 174.7645),
];

const SHAPES: [&str; 8] = [
    "cigar-shaped",
    "disc-shaped",
    "triangular",
    "spherical",
    "oval",
    "saucer-shaped",
    "boomerang-shaped",
    "black triangle",
];

const TIMES_OF_DAY: [&str; 4] = ["morning", "afternoon", "evening", "night"];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Generates the fallback dataset: one sighting per major city followed by
/// sightings at random locations. A seed makes the output reproducible.
pub fn generate_sample(seed: Option<u64>) -> Vec<Record> {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let total = MAJOR_CITIES.len() + RANDOM_SIGHTINGS;

    (0..total)
        .map(|index| {
            let (name, country, region, lat, lng) = MAJOR_CITIES.get(index).map_or_else(
                || {
                    (
                        format!("Location {index}"),
                        "Unknown",
                        "Unknown",
                        rng.gen_range(-70.0..70.0),
                        rng.gen_range(-180.0..180.0),
                    )
                },
                |c| (c.name.to_string(), c.country, c.region, c.lat, c.lng),
            );
            sighting(&mut rng, index, name, country, region, lat, lng)
        })
        .collect()
}

fn sighting(
    rng: &mut StdRng,
    index: usize,
    location: String,
    country: &str,
    region: &str,
    lat: f64,
    lng: f64,
) -> Record {
    let lat = (lat + (rng.gen::<f64>() - 0.5) * CLUSTER_JITTER).clamp(-90.0, 90.0);
    let lng = (lng + (rng.gen::<f64>() - 0.5) * CLUSTER_JITTER).clamp(-180.0, 180.0);

    let year = rng.gen_range(SAMPLE_MIN_YEAR..=SAMPLE_MAX_YEAR);
    let month = rng.gen_range(0..MONTHS.len());
    let day = rng.gen_range(1..=28);
    let credibility = rng.gen_range(1..=10);
    let category = Category::from_credibility(credibility);

    let shape = SHAPES.choose(rng).copied().unwrap_or("disc-shaped");
    let time_of_day = TIMES_OF_DAY.choose(rng).copied().unwrap_or("night");
    let duration = rng.gen_range(1..=30);
    let witnesses = rng.gen_range(1..=20);

    let evidence = match category {
        Category::Confirmed => {
            "was tracked on multiple radar systems and confirmed by military personnel."
        }
        Category::Probable => {
            "was photographed clearly and witnessed by multiple credible observers."
        }
        Category::Possible => {
            "was reported by a small number of witnesses with no physical evidence."
        }
    };

    let date = if year > 0 {
        format!("{}/{day}/{year}", month + 1)
    } else {
        format!("{day} {} {}", MONTHS[month], crate::domain::format_year(year))
    };

    Record {
        id: format!("sighting-{index}"),
        position: GeoPoint { lat, lng },
        category,
        year: Some(year),
        title: format!("UFO Sighting ({})", category.label()),
        date,
        location,
        region: region.to_string(),
        country: country.to_string(),
        credibility,
        description: format!(
            "This {shape} object was spotted in the {time_of_day} and observed for approximately \
             {duration} minutes by {witnesses} witnesses. The object {evidence}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_large_and_valid() {
        let records = generate_sample(Some(7));
        assert_eq!(records.len(), MAJOR_CITIES.len() + RANDOM_SIGHTINGS);
        for record in &records {
            assert!(GeoPoint::new(record.position.lat, record.position.lng).is_some());
            let year = record.year.unwrap_or(i32::MIN);
            assert!((SAMPLE_MIN_YEAR..=SAMPLE_MAX_YEAR).contains(&year));
            assert_eq!(record.category, Category::from_credibility(record.credibility));
        }
    }

    #[test]
    fn cities_come_first() {
        let records = generate_sample(Some(1));
        assert_eq!(records[0].location, "New York");
        assert_eq!(records[28].location, "Auckland");
        assert_eq!(records[29].location, "Location 29");
    }

    #[test]
    fn seed_makes_output_reproducible() {
        assert_eq!(generate_sample(Some(42)), generate_sample(Some(42)));
    }
}

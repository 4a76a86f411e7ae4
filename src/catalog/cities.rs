//! Malaysian cities and towns with population and centre coordinates.

use crate::domain::{CityTier, Location, Region};

pub fn malaysian_cities() -> Vec<Location> {
    use Region::*;

    let mut cities: Vec<Location> = [
        // Metropolis and major cities
        ("Kuala Lumpur", "Federal Territory", Central, 1_800_000, 3.1390, 101.6869),
        ("George Town", "Penang", Northern, 708_000, 5.4164, 100.3327),
        ("Ipoh", "Perak", Northern, 657_000, 4.5975, 101.0901),
        ("Shah Alam", "Selangor", Central, 641_000, 3.0733, 101.5185),
        ("Petaling Jaya", "Selangor", Central, 613_000, 3.1073, 101.6067),
        ("Johor Bahru", "Johor", Southern, 497_000, 1.4927, 103.7414),
        ("Kota Bharu", "Kelantan", EastCoast, 491_000, 6.1254, 102.2386),
        ("Subang Jaya", "Selangor", Central, 469_000, 3.0436, 101.5817),
        ("Malacca City", "Malacca", Southern, 455_000, 2.1896, 102.2501),
        ("Kota Kinabalu", "Sabah", EastMalaysia, 452_000, 5.9749, 116.0724),
        ("Klang", "Selangor", Central, 440_000, 3.0449, 101.4446),
        // Regional centres
        ("Alor Setar", "Kedah", Northern, 405_000, 6.1248, 100.3678),
        ("Puchong", "Selangor", Central, 388_000, 3.0253, 101.6168),
        ("Cheras", "Selangor", Central, 381_000, 3.1065, 101.7260),
        ("Seremban", "Negeri Sembilan", Central, 372_000, 2.7258, 101.9424),
        ("Kuantan", "Pahang", EastCoast, 366_000, 3.8077, 103.3260),
        ("Iskandar Puteri", "Johor", Southern, 360_000, 1.4260, 103.6600),
        ("Kajang", "Selangor", Central, 342_000, 2.9935, 101.7874),
        ("Kuching", "Sarawak", EastMalaysia, 325_000, 1.5533, 110.3592),
        ("Ampang Jaya", "Selangor", Central, 315_000, 3.1500, 101.7667),
        ("Tawau", "Sabah", EastMalaysia, 313_000, 4.2447, 117.8912),
        ("Miri", "Sarawak", EastMalaysia, 300_000, 4.3995, 113.9914),
        ("Kuala Terengganu", "Terengganu", EastCoast, 285_000, 5.3302, 103.1408),
        ("Sandakan", "Sabah", EastMalaysia, 279_000, 5.8402, 118.1179),
        // Smaller towns
        ("Taiping", "Perak", Northern, 245_000, 4.8500, 100.7333),
        ("Batu Pahat", "Johor", Southern, 239_000, 1.8548, 102.9325),
        ("Kluang", "Johor", Southern, 233_000, 2.0251, 103.3328),
        ("Sungai Petani", "Kedah", Northern, 228_000, 5.6470, 100.4877),
        ("Muar", "Johor", Southern, 210_000, 2.0442, 102.5689),
        ("Pasir Gudang", "Johor", Southern, 200_000, 1.4703, 103.9030),
        ("Sibu", "Sarawak", EastMalaysia, 183_000, 2.2870, 111.8305),
        ("Port Klang", "Selangor", Central, 180_000, 3.0000, 101.4000),
        ("Lahad Datu", "Sabah", EastMalaysia, 156_000, 5.0268, 118.3270),
        ("Putrajaya", "Federal Territory", Central, 109_000, 2.9264, 101.6964),
        ("Langkawi", "Kedah", Northern, 65_000, 6.3500, 99.8000),
        ("Cyberjaya", "Selangor", Central, 65_000, 2.9213, 101.6559),
    ]
    .into_iter()
    .map(|(name, state, region, population, lat, lon)| {
        Location::new(name, state, region, population, lat, lon)
    })
    .collect();

    for city in cities.iter_mut() {
        city.tier = match city.name.as_str() {
            "Langkawi" | "Malacca City" => Some(CityTier::Tourist),
            "Port Klang" | "Pasir Gudang" => Some(CityTier::Industrial),
            _ => None,
        };
    }

    cities
}

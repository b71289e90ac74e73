//! Geometry generators for synthetic drought and base map data.
//!
//! Rings are closed (first point repeated at the end) and wound clockwise
//! in lon/lat, which is the shapefile convention for exterior rings.

/// A closed, clockwise square ring with its south-west corner at (lon, lat).
///
/// # Example
///
/// ```
/// use test_utils::square_ring;
///
/// let ring = square_ring(-100.0, 35.0, 2.0);
/// assert_eq!(ring.len(), 5);
/// assert_eq!(ring.first(), ring.last());
/// ```
pub fn square_ring(lon: f64, lat: f64, size: f64) -> Vec<(f64, f64)> {
    rect_ring(lon, lat, lon + size, lat + size)
}

/// A closed, clockwise rectangle ring.
pub fn rect_ring(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Vec<(f64, f64)> {
    vec![
        (min_lon, min_lat),
        (min_lon, max_lat),
        (max_lon, max_lat),
        (max_lon, min_lat),
        (min_lon, min_lat),
    ]
}

/// A square ring centered on (lon, lat).
pub fn square_around(lon: f64, lat: f64, size: f64) -> Vec<(f64, f64)> {
    let half = size / 2.0;
    rect_ring(lon - half, lat - half, lon + half, lat + half)
}

/// Shapefile names for consecutive weekly snapshots starting January 1st.
///
/// Weeks past the end of December continue into the following year.
///
/// # Example
///
/// ```
/// use test_utils::weekly_names;
///
/// let names = weekly_names(2013, 3);
/// assert_eq!(names, vec!["USDM_20130101", "USDM_20130108", "USDM_20130115"]);
/// ```
pub fn weekly_names(year: i32, weeks: usize) -> Vec<String> {
    const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut names = Vec::with_capacity(weeks);
    let (mut year, mut month, mut day) = (year, 1u32, 1u32);

    for _ in 0..weeks {
        names.push(format!("USDM_{}{:02}{:02}", year, month, day));

        day += 7;
        let month_len = DAYS_IN_MONTH[month as usize - 1];
        if day > month_len {
            day -= month_len;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }
    }

    names
}

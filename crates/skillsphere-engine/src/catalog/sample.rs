//! Built-in sample catalog used when the configured data source is missing.
use crate::catalog::{Catalog, CatalogSource, Course, Level};

const BUSINESS: &str = "Business Finance";
const DESIGN: &str = "Graphic Design";
const MUSIC: &str = "Musical Instruments";
const WEB: &str = "Web Development";

// (title, subject, price, subscribers, level, hours)
const SAMPLE_ROWS: &[(&str, &str, f64, u64, &str, f64)] = &[
    ("Python for Financial Analysis and Algorithmic Trading", BUSINESS, 195.0, 29_167, "All Levels", 17.0),
    ("Stock Market Investing for Beginners", BUSINESS, 20.0, 4_210, "Beginner Level", 3.5),
    ("Financial Modeling for Business Analysts", BUSINESS, 75.0, 8_640, "Intermediate Level", 6.0),
    ("Introduction to Accounting Basics", BUSINESS, 0.0, 12_450, "Beginner Level", 2.0),
    ("Options Trading Strategies Advanced Course", BUSINESS, 150.0, 1_980, "Expert Level", 9.5),
    ("Excel for Financial Modeling", BUSINESS, 45.0, 6_320, "All Levels", 4.0),
    ("Photoshop In-Depth Master All Tools", DESIGN, 190.0, 53_851, "All Levels", 24.5),
    ("Graphic Design Fundamentals", DESIGN, 0.0, 18_230, "Beginner Level", 1.5),
    ("Logo Design Masterclass with Illustrator", DESIGN, 95.0, 7_415, "Intermediate Level", 8.0),
    ("Adobe Illustrator for Beginners", DESIGN, 25.0, 9_870, "Beginner Level", 3.0),
    ("Typography and Layout Design", DESIGN, 40.0, 2_310, "Intermediate Level", 2.5),
    ("Free Beginner Electric Guitar Lessons", MUSIC, 0.0, 101_154, "Beginner Level", 4.5),
    ("Learn Piano in 30 Days", MUSIC, 50.0, 14_902, "Beginner Level", 7.0),
    ("Guitar Chords and Strumming Patterns", MUSIC, 20.0, 5_115, "Beginner Level", 2.0),
    ("Jazz Piano Improvisation Advanced", MUSIC, 120.0, 1_245, "Expert Level", 10.0),
    ("Music Theory for Guitar Players", MUSIC, 35.0, 3_990, "Intermediate Level", 3.5),
    ("Learn HTML5 Programming From Scratch", WEB, 0.0, 268_923, "All Levels", 10.5),
    ("The Web Developer Bootcamp", WEB, 200.0, 121_584, "All Levels", 43.0),
    ("JavaScript Basics for Beginners", WEB, 20.0, 84_897, "Beginner Level", 5.0),
    ("Advanced JavaScript Concepts", WEB, 180.0, 47_238, "Expert Level", 25.5),
    ("Python Web Development with Django", WEB, 95.0, 22_610, "Intermediate Level", 12.0),
    ("Build Responsive Websites with HTML and CSS", WEB, 50.0, 35_770, "Beginner Level", 8.5),
    ("Learn Python Programming Masterclass", WEB, 195.0, 96_402, "All Levels", 40.0),
    ("Web Design for Beginners Real World Coding", WEB, 25.0, 43_117, "Beginner Level", 6.5),
];

/// A deterministic synthetic catalog spanning four subjects with a spread
/// of prices and popularity.
pub fn sample_catalog() -> Catalog {
    let courses = SAMPLE_ROWS
        .iter()
        .enumerate()
        .map(|(idx, &(title, subject, price, subscribers, level, hours))| {
            let slug: String = title
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-");
            let mut course = Course::new(title, price, subscribers)
                .with_id(format!("sample-{:03}", idx + 1))
                .with_subject(subject)
                .with_duration(hours)
                .with_url(format!("https://www.udemy.com/{}/", slug));
            course.level = Level::from_label(level);
            course
        })
        .collect();

    // The sample rows are unique and valid, so cleaning keeps every one.
    match Catalog::new(courses, Vec::new(), CatalogSource::Sample) {
        Ok(catalog) => catalog,
        Err(e) => unreachable!("built-in sample catalog is invalid: {}", e),
    }
}

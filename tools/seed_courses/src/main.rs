use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

struct Fixture {
    course_code: &'static str,
    title: &'static str,
    credits: i64,
    description: &'static str,
    semester: &'static str,
}

const COURSES: [Fixture; 8] = [
    Fixture { course_code: "CS101", title: "Intro Programming", credits: 3, description: "Learn Python basics", semester: "Fall 2024" },
    Fixture { course_code: "BIO120", title: "General Biology", credits: 3, description: "Introduction to biological principles", semester: "Fall 2024" },
    Fixture { course_code: "MATH150", title: "Calculus I", credits: 4, description: "Basic calculus", semester: "Fall 2024" },
    Fixture { course_code: "ENG101", title: "Composition I", credits: 3, description: "Academic writing and critical thinking", semester: "Spring 2025" },
    Fixture { course_code: "ME210", title: "Thermodynamics", credits: 3, description: "Principles of thermodynamics and heat transfer", semester: "Spring 2025" },
    Fixture { course_code: "CS301", title: "Database Systems", credits: 3, description: "Design and implementation of database systems", semester: "Fall 2024" },
    Fixture { course_code: "PHYS201", title: "Physics II", credits: 4, description: "Electricity, magnetism, and modern physics", semester: "Spring 2025" },
    Fixture { course_code: "CS201", title: "Data Structures", credits: 4, description: "Study of fundamental data structures and algorithms", semester: "Spring 2025" },
];

fn is_dry_run() -> bool {
    !std::env::args().any(|a| a == "--apply")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://university.db".to_string());

    run(&database_url, !is_dry_run()).await?;
    Ok(())
}

/// Returns the number of rows inserted; a dry run never opens the database.
async fn run(database_url: &str, apply: bool) -> Result<usize, Box<dyn std::error::Error>> {
    if !apply {
        for course in &COURSES {
            println!(
                "[DRY RUN] Would insert {} - {} ({} credits, {})",
                course.course_code, course.title, course.credits, course.semester
            );
        }
        println!(
            "Dry run complete, pass --apply to insert {} courses into {}",
            COURSES.len(),
            database_url
        );
        return Ok(0);
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;
    println!("Courses table ready in {}", database_url);

    // Rerunning duplicates rows: courseCode carries no unique constraint.
    let mut tx = pool.begin().await?;
    for course in &COURSES {
        sqlx::query(
            "INSERT INTO courses (courseCode, title, credits, description, semester) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(course.course_code)
        .bind(course.title)
        .bind(course.credits)
        .bind(course.description)
        .bind(course.semester)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    println!("Inserted {} courses", COURSES.len());

    pool.close().await;
    Ok(COURSES.len())
}

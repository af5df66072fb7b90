//! Bootstraps a fresh database: one administrator plus the default Computer
//! Science course catalog. Prints what it would do unless run with `--apply`.
//!
//! ```sh
//! ADMIN_EMAIL=admin@s.com ADMIN_PASSWORD=... cargo run --bin seed -- --apply
//! ```

use std::env;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_feedback::auth::TokenSigner;
use course_feedback::config::AppConfig;
use course_feedback::db::{self, courses};
use course_feedback::models::NewCourseRequest;
use course_feedback::services::{AccountService, CatalogService};

const DEPARTMENT: &str = "Computer Science";

/// (course name, teacher, semester)
const CS_COURSES: &[(&str, &str, i64)] = &[
    ("Introduction to Information and Communication Technology", "Mr Badar Sami", 1),
    ("Programming Fundamentals", "Dr Farhan Ahmed Siddiqui", 1),
    ("Applied Physics", "Ms Faiza Maryam", 1),
    ("Calculus and Analytical Geometry", "Mr Ilyas", 1),
    ("Functional English", "Ms Farheen Shafiq", 1),
    ("Islamic Studies or Ethics", "Mr Waqar Hussain", 1),
    ("Object Oriented Programming", "Dr Humera Tariq", 2),
    ("Digital Logic Design", "Mr Bari Ahmed", 2),
    ("Discrete Structures", "Mr Mukesh Kumar Rathi", 2),
    ("Linear Algebra", "Mr Asghar Shamsi", 2),
    ("Ideology and Constitution of Pakistan", "Ms Humera Muzaffar", 2),
    ("Communication and Presentation Skills", "Mr Sami ul Huda", 2),
    ("Data Structures And Algorithms", "Ms Maryam Feroze", 3),
    ("Computer Organization and Assembly Language", "Ms Farheen Faisal", 3),
    ("Software Engineering Fundamentals", "Mr Hussain Saleem", 3),
    ("Multivariable Calculus", "Mr Ilyas", 3),
    ("Probability and Statistics", "Dr Humera Bashir", 3),
    ("Urdu", "Dr Ansar Ahmed", 3),
    ("Database Management Systems", "Dr Khalid Jamal", 4),
    ("Computer Architecture", "Mr Taha Bin Niaz", 4),
    ("Theory of Automata", "Ms Madiha Khurram", 4),
    ("Software Project Management", "Ms Maryam Feroze", 4),
    ("Data Communication and Networking", "Mr Mukesh Kumar Rathi", 4),
    ("Introduction to Management", "Ms Maryam", 4),
    ("Software Engineering", "Ms Farheen Faisal", 5),
    ("Operating Systems", "Dr Mohammad Saeed", 5),
    ("Design and Analysis of Algorithms", "Mr Taha Bin Niaz", 5),
    ("Compiler Construction", "Mr Mukarram", 5),
    ("Computer Graphics", "Dr Humera Azam", 5),
    ("Artificial Intelligence", "Dr Nadeem Mahmood", 6),
    ("Advanced Software Engineering", "Ms Farheen Faisal", 6),
    ("Modelling and Simulation", "Dr Shaista Raees", 6),
    ("Parallel Computing", "Dr Mohammad Saeed", 6),
    ("Financial Accounting", "Mr Mairaj Ahmed", 7),
    ("Management Information Systems", "Dr Asim Ali", 7),
    ("Internet Application Development", "Dr Humera Tariq", 7),
    ("Network Security", "Dr Sadiq Ali Khan", 7),
    ("Data Warehousing", "Dr Khalid Jamal", 7),
    ("Distributed Database Systems", "Dr Nadeem Mahmood", 8),
    ("Neural Network and Fuzzy Logic", "Mr Adnan Zaidi", 8),
    ("Human Interaction with Computer", "Dr Syed Asim Ali", 8),
];

fn is_dry_run() -> bool {
    !env::args().any(|a| a == "--apply")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "seed=info,course_feedback=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    let dry_run = is_dry_run();
    let pool = if dry_run {
        db::connect_read_only(&config.database_url).await?
    } else {
        db::connect(&config.database_url).await?
    };
    let schema_ready = db::has_schema(&pool).await?;
    if !schema_ready {
        info!("[dry-run] database has no schema yet, every course is missing");
    }

    let mut planned = 0;
    let mut added = 0;
    let catalog = CatalogService::new(pool.clone());
    for (name, teacher, semester) in CS_COURSES {
        if schema_ready
            && courses::find_course_by_key(&pool, name, *semester, DEPARTMENT)
                .await?
                .is_some()
        {
            continue;
        }
        planned += 1;
        if dry_run {
            info!("[dry-run] would add Sem {} {} ({})", semester, name, teacher);
            continue;
        }
        catalog
            .create(NewCourseRequest {
                course_name: Some(name.to_string()),
                teacher: Some(teacher.to_string()),
                semester: Some(*semester),
                department: Some(DEPARTMENT.to_string()),
            })
            .await?;
        added += 1;
    }
    info!("courses: {} missing, {} added", planned, added);

    match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        (Ok(email), Ok(password)) if dry_run => {
            info!("[dry-run] would create admin {} ({} char password)", email, password.len());
        }
        (Ok(email), Ok(password)) => {
            let accounts = AccountService::new(
                pool.clone(),
                TokenSigner::new(&config.jwt_secret),
                config.allowed_email_domain.clone(),
            );
            match accounts.create_admin(&email, &password).await? {
                Some(admin) => info!("admin {} created", admin.email),
                None => info!("admin {} already exists", email),
            }
        }
        _ => warn!("ADMIN_EMAIL / ADMIN_PASSWORD not set, skipping admin"),
    }

    if dry_run {
        info!("dry run finished, pass --apply to write");
    }
    Ok(())
}

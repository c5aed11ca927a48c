use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rand::{Rng, seq::SliceRandom};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use rental_admin::{
    ListingForm, RentalRequest, RentalStatus, Role, book_rental, create_listing, create_user,
    initialize_db, update_status,
};

/// A utility for creating a seeded database for the rental admin server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long)]
    db_path: String,

    /// How many listings to create.
    #[arg(long, default_value_t = 10_000)]
    listings: u32,

    /// How many rentals to book across the seeded listings.
    #[arg(long, default_value_t = 500)]
    transactions: u32,
}

const AREAS: [&str; 6] = [
    "Canggu",
    "Ubud",
    "Seminyak",
    "Kuta",
    "Uluwatu",
    "Sanur",
];

const KINDS: [&str; 4] = ["Villa", "Loft", "Bungalow", "Studio"];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let db_path = Path::new(&args.db_path);

    if db_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Database path must include a file extension (e.g., 'rentals.db').");
        exit(1);
    }

    if db_path.is_file() {
        eprintln!("File already exists at {db_path:#?}!");
        exit(1);
    }

    println!("Creating database at {db_path:#?}");
    let conn = Connection::open(db_path)?;

    initialize_db(&conn)?;

    println!("Creating admin and customer users...");
    create_user("Superadmin", "admin@gmail.com", Role::Admin, &conn)?;
    let customer = create_user("Test Customer", "customer@gmail.com", Role::Customer, &conn)?;

    let mut rng = rand::thread_rng();
    let now = OffsetDateTime::now_utc();

    println!("Creating {} listings...", args.listings);
    let seed = conn.unchecked_transaction()?;
    let mut listings = Vec::with_capacity(args.listings as usize);

    for i in 0..args.listings {
        let area = AREAS.choose(&mut rng).copied().unwrap_or("Bali");
        let kind = KINDS.choose(&mut rng).copied().unwrap_or("Villa");
        let form = ListingForm {
            title: format!("{kind} in {area} #{}", i + 1),
            description: format!("A comfortable {} in {area}.", kind.to_lowercase()),
            address: format!("Jl. {area} No. {}", rng.gen_range(1..300)),
            sqft: rng.gen_range(300..5_000),
            max_person: rng.gen_range(1..12),
            wifi_speed: rng.gen_range(10..500),
            price_per_day: Decimal::from(rng.gen_range(20..2_000) * 1_000),
            full_support_available: rng.r#gen(),
            gym_area_available: rng.r#gen(),
            mini_cafe_available: rng.r#gen(),
            cinema_available: rng.r#gen(),
        };
        let created_at = now - Duration::days(rng.gen_range(0..365));

        let listing = create_listing(&form, created_at, &seed)?;
        listings.push((listing.id, listing.created_at));
    }

    println!("Booking {} rentals...", args.transactions);
    for _ in 0..args.transactions {
        let Some(&(listing_id, listed_at)) = listings.choose(&mut rng) else {
            break;
        };
        let booked_at = random_booking_time(listed_at, now, &mut rng);
        let start_date = booked_at.date() + Duration::days(rng.gen_range(1..30));
        let end_date = start_date + Duration::days(rng.gen_range(0..14));

        let request = RentalRequest::new(listing_id, start_date, end_date)?;
        let transaction = book_rental(customer.id, &request, booked_at, &seed)?;

        match rng.gen_range(0..10) {
            0..=5 => {
                update_status(transaction.id, RentalStatus::Completed, &seed)?;
            }
            6 => {
                update_status(transaction.id, RentalStatus::Cancelled, &seed)?;
            }
            _ => {}
        }
    }

    seed.commit()?;

    println!("Success!");

    Ok(())
}

/// Pick a time between a listing going up at `listed_at` and `now`.
fn random_booking_time(
    listed_at: OffsetDateTime,
    now: OffsetDateTime,
    rng: &mut impl Rng,
) -> OffsetDateTime {
    let listed_for = (now - listed_at).whole_seconds().max(0);

    listed_at + Duration::seconds(rng.gen_range(0..=listed_for))
}

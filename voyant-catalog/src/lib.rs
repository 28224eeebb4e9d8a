pub mod inventory;
pub mod pricing;
pub mod product;
pub mod review;

pub use inventory::{AvailabilityQuery, CarAvailability, RoomAvailability};
pub use pricing::{PriceQuote, PricingError, StayWindow, TourDuration};
pub use product::{Bookable, Car, Destination, Flight, Hotel, ProductType, TourPackage};
pub use review::{NewReview, Review, ReviewImage};

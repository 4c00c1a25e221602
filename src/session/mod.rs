mod birthday;
mod record;
mod zodiac;

pub use birthday::{birthday_age, birthdays_on, Birthday};
pub use record::{parse_date, PaymentStatus, ServiceType, SessionRecord};
pub use zodiac::ZodiacSign;

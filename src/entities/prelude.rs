pub use super::tokens::Entity as Tokens;

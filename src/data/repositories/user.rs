use crate::data::models::NewUser;
use crate::data::models::User;
use crate::schema::users;
use bcrypt::hash;
use bcrypt::verify;
use diesel::prelude::*;

pub struct UserRepository;

impl UserRepository {
    pub fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_id(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> Result<Option<User>, diesel::result::Error> {
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn verify_password(
        stored_hash: &str,
        input_password: &str,
    ) -> Result<bool, bcrypt::BcryptError> {
        verify(input_password, stored_hash)
    }

    /// Hashes before inserting; the hash is computed outside of any transaction
    pub fn create_user(
        conn: &mut SqliteConnection,
        email: &str,
        name: &str,
        password: &str,
        cost: u32,
    ) -> Result<User, crate::features::errors::ApiError> {
        let hashed_password = hash(password, cost)?;

        diesel::insert_into(users::table)
            .values(&NewUser {
                email,
                name,
                password: &hashed_password,
            })
            .execute(conn)?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(conn)?;
        Ok(user)
    }

    pub fn email_exists(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(users::table.filter(users::email.eq(email)))).get_result(conn)
    }
}

pub mod fixed;
pub mod supabase;

pub mod profile_supabase_repo;

pub mod apriori;

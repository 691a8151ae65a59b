// Unit tests for business rules

#[cfg(test)]
mod tests {
    use crate::domain::rules::*;
    use std::path::Path;

    #[test]
    fn test_supported_extensions() {
        assert!(SubmissionRules::is_supported(Path::new("clip.mp4")));
        assert!(SubmissionRules::is_supported(Path::new("clip.MOV")));
        assert!(SubmissionRules::is_supported(Path::new("/tmp/dir/clip.avi")));
        assert!(!SubmissionRules::is_supported(Path::new("clip.mkv")));
        assert!(!SubmissionRules::is_supported(Path::new("notes.txt")));
        assert!(!SubmissionRules::is_supported(Path::new("mp4")));
    }

    #[test]
    fn test_filter_keeps_order_and_drops_others() {
        let kept = SubmissionRules::filter_supported(["b.mov", "readme.md", "a.mp4", "c.webm"]);
        assert_eq!(kept, vec![Path::new("b.mov"), Path::new("a.mp4")]);
    }

    #[test]
    fn test_assemble_deduplicates() {
        let batch = SubmissionRules::assemble(["a.mp4", "a.mp4", "b.avi", "x.txt"], false);
        assert_eq!(batch.len(), 2);
        assert!(!batch.compress());
    }

    #[test]
    fn test_output_path_naming() {
        assert_eq!(
            OutputNaming::output_path(Path::new("/videos/holiday.mov")),
            Path::new("/videos/holiday_processed.mp4")
        );
        assert_eq!(
            OutputNaming::output_path(Path::new("clip.final.avi")),
            Path::new("clip.final_processed.mp4")
        );
    }

    #[test]
    fn test_output_path_is_stable() {
        let input = Path::new("/videos/a.mp4");
        assert_eq!(OutputNaming::output_path(input), OutputNaming::output_path(input));
    }
}
